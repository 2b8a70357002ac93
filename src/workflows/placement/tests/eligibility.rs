use super::common::*;
use crate::workflows::placement::domain::{OpportunityStatus, SkillLevel};
use crate::workflows::placement::eligibility::{cgpa_shortfall, eligible_count, is_eligible};

#[test]
fn cgpa_below_floor_is_not_eligible() {
    let candidate = profile(6.0, &[]);
    let posting = opportunity("sql-analyst", Some(7.5), &["SQL"]);

    assert!(!is_eligible(&candidate, &posting));
    let shortfall = cgpa_shortfall(candidate.cgpa, &posting).expect("shortfall reported");
    assert!((shortfall - 1.5).abs() < f64::EPSILON);
}

#[test]
fn missing_skills_do_not_block_eligibility() {
    let candidate = profile(8.0, &[]);
    let posting = opportunity("platform", Some(7.0), &["Kubernetes", "Go"]);

    assert!(is_eligible(&candidate, &posting));
    assert_eq!(cgpa_shortfall(candidate.cgpa, &posting), None);
}

#[test]
fn inactive_opportunities_never_qualify() {
    let candidate = profile(9.5, &[("Rust", SkillLevel::Advanced)]);
    let mut posting = opportunity("closed", None, &[]);

    for status in [OpportunityStatus::Closed, OpportunityStatus::Draft] {
        posting.status = status;
        assert!(!is_eligible(&candidate, &posting));
    }
}

#[test]
fn eligibility_never_decreases_with_higher_cgpa() {
    let floors = [None, Some(0.0), Some(5.5), Some(7.5), Some(10.0)];
    let cgpas: Vec<f64> = (0..=40u32).map(|step| f64::from(step) * 0.25).collect();

    for floor in floors {
        let posting = opportunity("gate", floor, &["SQL"]);
        for window in cgpas.windows(2) {
            let lower = profile(window[0], &[]);
            let higher = profile(window[1], &[]);
            if is_eligible(&lower, &posting) {
                assert!(
                    is_eligible(&higher, &posting),
                    "eligibility dropped from {} to {} at floor {:?}",
                    window[0],
                    window[1],
                    floor
                );
            }
        }
    }
}

#[test]
fn eligible_count_covers_only_qualifying_postings() {
    let candidate = profile(7.0, &[]);
    let mut closed = opportunity("closed", None, &[]);
    closed.status = OpportunityStatus::Closed;
    let corpus = vec![
        opportunity("open", None, &[]),
        opportunity("gated-low", Some(6.5), &[]),
        opportunity("gated-high", Some(8.0), &[]),
        closed,
    ];

    assert_eq!(eligible_count(&candidate, &corpus), 2);
}
