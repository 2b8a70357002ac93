use chrono::NaiveDate;

use super::common::*;
use crate::workflows::placement::domain::{
    Application, ApplicationId, ApplicationStatus, ChangeSet, SimulationChange, SkillLevel,
    ValidationError,
};

const ALL_STATUSES: [ApplicationStatus; 5] = [
    ApplicationStatus::Pending,
    ApplicationStatus::Shortlisted,
    ApplicationStatus::InterviewScheduled,
    ApplicationStatus::Accepted,
    ApplicationStatus::Rejected,
];

#[test]
fn submission_captures_a_snapshot() {
    let mut candidate = profile(7.8, &[("Python", SkillLevel::Advanced)]);
    let posting = opportunity("job-1", Some(7.0), &["Python", "SQL"]);
    let submitted_on = NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid date");

    let application = Application::submit(
        ApplicationId("app-1".to_string()),
        &candidate,
        &posting,
        submitted_on,
    );

    candidate.cgpa = 6.0;
    candidate.skills.clear();

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert!(application.uses_snapshot());
    assert_eq!(application.effective_cgpa(&candidate), 7.8);
    assert_eq!(application.effective_skills(&candidate).len(), 1);
    assert_eq!(application.submitted_on, Some(submitted_on));
}

#[test]
fn terminal_states_reject_every_transition() {
    for terminal in [ApplicationStatus::Accepted, ApplicationStatus::Rejected] {
        for next in ALL_STATUSES {
            let error = terminal.transition(next).expect_err("terminal state is final");
            assert_eq!(
                error,
                ValidationError::InvalidTransition {
                    from: terminal,
                    to: next,
                }
            );
        }
    }
}

#[test]
fn rejection_is_reachable_from_every_open_stage() {
    for open in [
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
    ] {
        assert_eq!(
            open.transition(ApplicationStatus::Rejected),
            Ok(ApplicationStatus::Rejected)
        );
    }
}

#[test]
fn review_only_moves_forward() {
    assert!(ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Shortlisted));
    assert!(ApplicationStatus::Shortlisted.can_transition_to(ApplicationStatus::Accepted));
    assert!(!ApplicationStatus::InterviewScheduled.can_transition_to(ApplicationStatus::Pending));
    assert!(!ApplicationStatus::Shortlisted.can_transition_to(ApplicationStatus::Shortlisted));

    let mut application = rejected("app-2", opportunity("job-2", None, &[]));
    application.status = ApplicationStatus::Pending;
    application
        .update_status(ApplicationStatus::InterviewScheduled)
        .expect("forward move allowed");
    application
        .update_status(ApplicationStatus::Rejected)
        .expect("rejection allowed");
    assert!(application.update_status(ApplicationStatus::Accepted).is_err());
    assert!(application.is_rejected());
}

#[test]
fn status_labels_round_trip_through_parse() {
    for status in ALL_STATUSES {
        assert_eq!(ApplicationStatus::parse(status.label()), Ok(status));
    }
    assert_eq!(
        ApplicationStatus::parse("interview scheduled"),
        Ok(ApplicationStatus::InterviewScheduled)
    );
    assert!(ApplicationStatus::parse("ghosted").is_err());
}

#[test]
fn change_set_accumulates_by_kind_and_name() {
    let mut changes = ChangeSet::new();
    changes
        .push(SimulationChange::Skill {
            name: "AWS".to_string(),
            level: SkillLevel::Beginner,
        })
        .expect("skill accepted");
    changes
        .push(SimulationChange::Certification {
            name: "aws".to_string(),
        })
        .expect("certification keyed separately from skills");
    changes
        .push(SimulationChange::Cgpa { target: 8.0 })
        .expect("cgpa accepted");
    changes
        .push(SimulationChange::Cgpa { target: 8.5 })
        .expect("cgpa replaced");

    assert_eq!(changes.len(), 3);
    assert_eq!(changes.cgpa_target(), Some(8.5));
    assert_eq!(changes.certifications(), vec!["aws"]);
    assert_eq!(
        changes.push(SimulationChange::Certification {
            name: " AWS ".to_string(),
        }),
        Err(ValidationError::DuplicateChange {
            key: "certification:aws".to_string(),
        })
    );
    assert_eq!(
        changes.push(SimulationChange::Skill {
            name: "   ".to_string(),
            level: SkillLevel::Beginner,
        }),
        Err(ValidationError::EmptyChangeName)
    );
}
