use std::collections::HashMap;

use crate::workflows::placement::domain::{SimulationChange, SkillLevel};
use crate::workflows::placement::ranking::{rank, ChangeAssessment};

fn skill(name: &str) -> SimulationChange {
    SimulationChange::Skill {
        name: name.to_string(),
        level: SkillLevel::Intermediate,
    }
}

fn assessment(immediate_yield: usize, effort: u32) -> ChangeAssessment {
    ChangeAssessment {
        immediate_yield,
        long_term_yield: immediate_yield,
        effort,
    }
}

fn ranked_names(changes: &[SimulationChange], yields: &[(usize, u32)]) -> Vec<String> {
    let assessments: HashMap<_, _> = changes
        .iter()
        .zip(yields)
        .map(|(change, (immediate, effort))| (change.key(), assessment(*immediate, *effort)))
        .collect();

    rank(changes, &assessments)
        .into_iter()
        .map(|entry| entry.change.action())
        .collect()
}

#[test]
fn higher_yield_ranks_first() {
    let changes = vec![skill("Go"), skill("SQL"), SimulationChange::Cgpa { target: 8.0 }];

    let order = ranked_names(&changes, &[(1, 2), (4, 8), (2, 1)]);

    assert_eq!(
        order,
        vec![
            "Learn SQL (Intermediate)",
            "Raise CGPA to 8.00",
            "Learn Go (Intermediate)",
        ]
    );
}

#[test]
fn lower_effort_breaks_yield_ties() {
    let changes = vec![skill("Kubernetes"), skill("Docker")];

    let order = ranked_names(&changes, &[(3, 8), (3, 2)]);

    assert_eq!(
        order,
        vec!["Learn Docker (Intermediate)", "Learn Kubernetes (Intermediate)"]
    );
}

#[test]
fn full_ties_preserve_input_order() {
    let changes = vec![skill("Alpha"), skill("Beta"), skill("Gamma"), skill("Delta")];

    let order = ranked_names(&changes, &[(2, 4), (2, 4), (5, 1), (2, 4)]);

    assert_eq!(
        order,
        vec![
            "Learn Gamma (Intermediate)",
            "Learn Alpha (Intermediate)",
            "Learn Beta (Intermediate)",
            "Learn Delta (Intermediate)",
        ]
    );
}

#[test]
fn unassessed_changes_sink_to_the_bottom() {
    let changes = vec![
        SimulationChange::Certification {
            name: "AWS".to_string(),
        },
        skill("SQL"),
    ];
    let mut assessments = HashMap::new();
    assessments.insert(changes[1].key(), assessment(0, 3));

    let ranked = rank(&changes, &assessments);

    assert_eq!(ranked[0].change, changes[1]);
    assert_eq!(ranked[1].assessment, ChangeAssessment::UNASSESSED);
}
