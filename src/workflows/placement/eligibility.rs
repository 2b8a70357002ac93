use super::domain::{Opportunity, Profile};

/// Binary gate: the opportunity is open and the CGPA floor, if any, is met.
///
/// Required skills do not participate; they only feed the match score.
pub fn is_eligible(profile: &Profile, opportunity: &Opportunity) -> bool {
    opportunity.is_active() && meets_cgpa(profile.cgpa, opportunity.min_cgpa)
}

pub fn eligible_count(profile: &Profile, corpus: &[Opportunity]) -> usize {
    corpus
        .iter()
        .filter(|opportunity| is_eligible(profile, opportunity))
        .count()
}

/// How far `cgpa` falls below the opportunity's floor, if it does.
pub fn cgpa_shortfall(cgpa: f64, opportunity: &Opportunity) -> Option<f64> {
    opportunity
        .min_cgpa
        .filter(|min| cgpa < *min)
        .map(|min| min - cgpa)
}

pub(crate) fn meets_cgpa(cgpa: f64, min_cgpa: Option<f64>) -> bool {
    min_cgpa.map(|min| cgpa >= min).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_floor_always_passes() {
        assert!(meets_cgpa(0.0, None));
        assert!(meets_cgpa(7.5, Some(7.5)));
        assert!(!meets_cgpa(7.49, Some(7.5)));
    }
}
