use super::common::*;
use crate::workflows::placement::domain::{
    OpportunityId, OpportunityStatus, SimulationChange, SkillLevel, ValidationError,
};
use crate::workflows::placement::ranking::{ChangeAssessment, RankedChange};
use crate::workflows::placement::simulation::{
    apply_changes, build_timeline, default_effort, simulate, ReferenceSelection,
    SimulationOptions,
};

fn skill(name: &str, level: SkillLevel) -> SimulationChange {
    SimulationChange::Skill {
        name: name.to_string(),
        level,
    }
}

#[test]
fn empty_change_list_is_idempotent() {
    let candidate = profile(7.0, &[("SQL", SkillLevel::Intermediate)]);
    let corpus = vec![
        opportunity("job-1", Some(6.0), &["SQL", "React"]),
        opportunity("job-2", Some(8.0), &[]),
    ];

    let result = simulate(&candidate, &[], &corpus, &SimulationOptions::default())
        .expect("simulation runs");

    assert_eq!(result.current_eligible_count, 1);
    assert_eq!(result.delta_eligible_count, 0);
    assert!(result.match_score_improvements.is_empty());
    assert!(result.recommended_path.is_empty());
    assert!(result.timeline.is_empty());
}

#[test]
fn raising_cgpa_unlocks_gated_opportunity() {
    let candidate = profile(6.0, &[]);
    let corpus = vec![opportunity("sql-analyst", Some(7.5), &["SQL"])];
    let changes = vec![SimulationChange::Cgpa { target: 8.0 }];

    let result = simulate(&candidate, &changes, &corpus, &SimulationOptions::default())
        .expect("simulation runs");

    assert_eq!(result.current_eligible_count, 0);
    assert_eq!(result.new_eligible_count, 1);
    assert_eq!(result.delta_eligible_count, 1);
    assert!(result.match_score_improvements.is_empty());
    assert_eq!(result.recommended_path[0].immediate_yield, 1);
}

#[test]
fn adding_skills_reports_changed_scores_only() {
    let candidate = profile(8.0, &[("SQL", SkillLevel::Advanced)]);
    let corpus = vec![
        opportunity("job-1", None, &["SQL", "React"]),
        opportunity("job-2", None, &["Python"]),
        opportunity("job-3", None, &["react"]),
    ];
    let changes = vec![skill("React", SkillLevel::Beginner)];

    let result = simulate(&candidate, &changes, &corpus, &SimulationOptions::default())
        .expect("simulation runs");

    assert_eq!(result.delta_eligible_count, 0);
    let improvements: Vec<_> = result
        .match_score_improvements
        .iter()
        .map(|entry| (entry.opportunity_label.as_str(), entry.before, entry.after))
        .collect();
    assert_eq!(
        improvements,
        vec![("Acme - Role job-1", 50, 100), ("Acme - Role job-3", 0, 100)]
    );
    assert_eq!(result.recommended_path[0].immediate_yield, 2);
}

#[test]
fn additive_changes_never_reduce_eligibility() {
    let corpus = vec![
        opportunity("job-1", Some(6.0), &["SQL"]),
        opportunity("job-2", Some(7.0), &["Go", "Docker"]),
        opportunity("job-3", Some(8.5), &[]),
        opportunity("job-4", None, &["React"]),
    ];
    let batches = vec![
        vec![skill("Go", SkillLevel::Advanced)],
        vec![SimulationChange::Cgpa { target: 7.0 }],
        vec![
            SimulationChange::Cgpa { target: 9.0 },
            skill("Docker", SkillLevel::Beginner),
            SimulationChange::Certification {
                name: "CKA".to_string(),
            },
        ],
    ];

    for start in [5.0, 6.5, 7.0] {
        let candidate = profile(start, &[("SQL", SkillLevel::Beginner)]);
        for changes in &batches {
            let raises_only = changes.iter().all(|change| match change {
                SimulationChange::Cgpa { target } => *target >= start,
                _ => true,
            });
            if !raises_only {
                continue;
            }
            let result = simulate(&candidate, changes, &corpus, &SimulationOptions::default())
                .expect("simulation runs");
            assert!(result.delta_eligible_count >= 0);
        }
    }
}

#[test]
fn only_active_opportunities_participate() {
    let candidate = profile(9.0, &[]);
    let mut draft = opportunity("draft", None, &["SQL"]);
    draft.status = OpportunityStatus::Draft;
    let corpus = vec![draft, opportunity("open", None, &[])];

    let result = simulate(
        &candidate,
        &[skill("SQL", SkillLevel::Advanced)],
        &corpus,
        &SimulationOptions::default(),
    )
    .expect("simulation runs");

    assert_eq!(result.current_eligible_count, 1);
    assert!(result.match_score_improvements.is_empty());
}

#[test]
fn duplicate_skill_changes_are_rejected() {
    let candidate = profile(7.0, &[]);
    let changes = vec![
        skill("React", SkillLevel::Beginner),
        skill(" react ", SkillLevel::Advanced),
    ];

    let error = simulate(&candidate, &changes, &[], &SimulationOptions::default())
        .expect_err("duplicates rejected");

    assert_eq!(
        error,
        ValidationError::DuplicateChange {
            key: "skill:react".to_string(),
        }
    );
}

#[test]
fn later_cgpa_change_wins() {
    let candidate = profile(6.0, &[]);
    let corpus = vec![opportunity("job-1", Some(7.5), &[])];
    let changes = vec![
        SimulationChange::Cgpa { target: 9.0 },
        SimulationChange::Cgpa { target: 7.0 },
    ];

    let result = simulate(&candidate, &changes, &corpus, &SimulationOptions::default())
        .expect("simulation runs");

    assert_eq!(result.delta_eligible_count, 0);
    assert_eq!(result.recommended_path.len(), 1);
    assert_eq!(result.recommended_path[0].action, "Raise CGPA to 7.00");
}

#[test]
fn out_of_range_cgpa_target_is_invalid() {
    let candidate = profile(6.0, &[]);
    let changes = vec![SimulationChange::Cgpa { target: 11.0 }];

    let error = simulate(&candidate, &changes, &[], &SimulationOptions::default())
        .expect_err("target rejected");

    assert!(matches!(error, ValidationError::InvalidCgpaTarget { .. }));
}

#[test]
fn existing_skill_is_upgraded_not_duplicated() {
    let candidate = profile(7.0, &[("SQL", SkillLevel::Intermediate)]);

    let upgraded = apply_changes(&candidate, &[skill("sql", SkillLevel::Advanced)]);
    assert_eq!(upgraded.skills.len(), 1);
    assert_eq!(upgraded.skills[0].level, SkillLevel::Advanced);

    let kept = apply_changes(&candidate, &[skill("SQL", SkillLevel::Beginner)]);
    assert_eq!(kept.skills[0].level, SkillLevel::Intermediate);
    assert_eq!(candidate.skills[0].level, SkillLevel::Intermediate);
}

#[test]
fn certifications_are_recorded_without_effect() {
    let candidate = profile(7.0, &[]);
    let corpus = vec![opportunity("job-1", Some(8.0), &["AWS"])];
    let changes = vec![SimulationChange::Certification {
        name: "AWS".to_string(),
    }];

    let result = simulate(&candidate, &changes, &corpus, &SimulationOptions::default())
        .expect("simulation runs");

    assert_eq!(result.delta_eligible_count, 0);
    assert!(result.match_score_improvements.is_empty());
    assert_eq!(result.recorded_certifications, vec!["AWS"]);
    assert_eq!(result.recommended_path[0].immediate_yield, 0);
    assert_eq!(result.recommended_path[0].long_term_yield, 0);
}

#[test]
fn long_term_yield_counts_gated_score_gains() {
    let candidate = profile(6.0, &[]);
    let corpus = vec![
        opportunity("open", None, &["Go"]),
        opportunity("gated", Some(8.0), &["Go"]),
    ];

    let result = simulate(
        &candidate,
        &[skill("Go", SkillLevel::Intermediate)],
        &corpus,
        &SimulationOptions::default(),
    )
    .expect("simulation runs");

    let step = &result.recommended_path[0];
    assert_eq!(step.immediate_yield, 1);
    assert_eq!(step.long_term_yield, 2);
}

#[test]
fn reference_selection_limits_reported_scores() {
    let candidate = profile(8.0, &[]);
    let corpus = vec![
        opportunity_at("Acme", "job-1", &["Rust"]),
        opportunity_at("Globex", "job-2", &["Rust"]),
        opportunity_at("Initech", "job-3", &["Rust"]),
    ];
    let changes = vec![skill("Rust", SkillLevel::Beginner)];

    let by_company = SimulationOptions::default()
        .with_reference(ReferenceSelection::companies(["globex", " "]));
    let result = simulate(&candidate, &changes, &corpus, &by_company).expect("simulation runs");
    assert_eq!(result.match_score_improvements.len(), 1);
    assert_eq!(
        result.match_score_improvements[0].opportunity_label,
        "Globex - Role job-2"
    );

    let by_id = SimulationOptions::default().with_reference(ReferenceSelection::Ids(vec![
        OpportunityId("job-1".to_string()),
        OpportunityId("job-3".to_string()),
    ]));
    let result = simulate(&candidate, &changes, &corpus, &by_id).expect("simulation runs");
    assert_eq!(result.match_score_improvements.len(), 2);

    assert_eq!(
        ReferenceSelection::companies(Vec::<String>::new()),
        ReferenceSelection::All
    );
}

#[test]
fn timeline_follows_rank_order_with_cumulative_periods() {
    let candidate = profile(6.0, &[]);
    let corpus = vec![
        opportunity("job-1", Some(7.0), &[]),
        opportunity("job-2", None, &["Docker"]),
    ];
    let docker = skill("Docker", SkillLevel::Beginner);
    let cgpa = SimulationChange::Cgpa { target: 7.25 };
    let cert = SimulationChange::Certification {
        name: "Scrum".to_string(),
    };
    let options = SimulationOptions {
        effort_unit: "weeks".to_string(),
        ..SimulationOptions::default()
    }
    .with_effort(&cert, 1);

    let result = simulate(
        &candidate,
        &[cert.clone(), cgpa.clone(), docker.clone()],
        &corpus,
        &options,
    )
    .expect("simulation runs");

    // cgpa: yield 1, effort ceil(1.25 * 10) = 13; docker: yield 1, effort 2; cert: yield 0, effort 1
    assert_eq!(default_effort(&cgpa, &candidate), 13);
    assert_eq!(default_effort(&docker, &candidate), 2);
    let actions: Vec<_> = result
        .recommended_path
        .iter()
        .map(|step| step.change.clone())
        .collect();
    assert_eq!(actions, vec![docker, cgpa, cert]);

    let periods: Vec<_> = result
        .timeline
        .iter()
        .map(|entry| entry.period.as_str())
        .collect();
    assert_eq!(periods, vec!["weeks 1-2", "weeks 3-15", "week 16"]);
}

#[test]
fn single_unit_periods_use_the_singular_unit() {
    let ranked: Vec<RankedChange> = [("Go", 1), ("SQL", 3), ("Docker", 0)]
        .into_iter()
        .map(|(name, effort)| RankedChange {
            change: skill(name, SkillLevel::Beginner),
            assessment: ChangeAssessment {
                immediate_yield: 1,
                long_term_yield: 1,
                effort,
            },
        })
        .collect();

    let periods = |unit: &str| -> Vec<String> {
        build_timeline(&ranked, unit)
            .into_iter()
            .map(|entry| entry.period)
            .collect()
    };

    assert_eq!(periods("weeks"), vec!["week 1", "weeks 2-4", "week 5"]);
    assert_eq!(periods("days"), vec!["day 1", "days 2-4", "day 5"]);
    assert_eq!(periods("sprint"), vec!["sprint 1", "sprint 2-4", "sprint 5"]);
    assert_eq!(periods("class"), vec!["class 1", "class 2-4", "class 5"]);
}
