//! Demo data for walkthroughs and tests. Never used by the regular intake path.

use chrono::{Datelike, Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::models::{
    FnolClaimant, FnolDocuments, FnolHistory, FnolIncident, FnolPayload, FnolPolicy, FnolVehicle,
};

const VEHICLES: &[(&str, &str)] = &[
    ("Toyota", "Camry"),
    ("Honda", "City"),
    ("Hyundai", "Creta"),
    ("Maruti Suzuki", "Swift"),
    ("Tata", "Nexon"),
    ("Mahindra", "XUV700"),
];
const DRIVERS: &[&str] = &[
    "Sarah Mitchell",
    "Ravi Kumar",
    "Ananya Sharma",
    "Mark Chen",
    "Priya Rao",
];
const LOCATIONS: &[&str] = &["Bangalore", "Mumbai", "Chennai", "Pune", "Hyderabad"];
const CLAIM_TYPES: &[&str] = &["Own Damage", "Third Party", "Theft"];
const LOSSES: &[&str] = &[
    "Rear-ended at a traffic signal, bumper and tail lamp damaged",
    "Side swipe while parking, left door dented",
    "Hit a pothole at speed, front suspension and alloy damaged",
    "Windshield cracked by falling debris",
];
const STATE_CODES: &[&str] = &["KA", "MH", "TN", "TS"];

/// A plausible, internally consistent intake payload.
pub fn demo_fnol_payload<R: Rng + ?Sized>(rng: &mut R) -> FnolPayload {
    let now = Utc::now();
    let (make, model) = *VEHICLES.choose(rng).unwrap_or(&("Toyota", "Camry"));
    let policy_start = now.date_naive() - Duration::days(rng.random_range(30..330));
    let loss_at = now - Duration::hours(rng.random_range(2..240));
    let photos_uploaded = rng.random_bool(0.8);

    FnolPayload {
        claim_id: format!("CLM-{}-{:04}", now.year(), rng.random_range(1..10_000)),
        policy: FnolPolicy {
            policy_number: format!("POL-{:08}", rng.random_range(0..100_000_000)),
            policy_status: "Active".to_string(),
            coverage_type: "Comprehensive".to_string(),
            policy_start_date: policy_start.format("%Y-%m-%d").to_string(),
            policy_end_date: (policy_start + Duration::days(365)).format("%Y-%m-%d").to_string(),
        },
        vehicle: FnolVehicle {
            registration_number: format!(
                "{}{:02}AB{:04}",
                STATE_CODES.choose(rng).unwrap_or(&"KA"),
                rng.random_range(1..60),
                rng.random_range(1..10_000)
            ),
            make: make.to_string(),
            model: model.to_string(),
            year: now.year() - rng.random_range(0..8),
        },
        incident: FnolIncident {
            date_time_of_loss: loss_at.format("%Y-%m-%dT%H:%M").to_string(),
            location: LOCATIONS.choose(rng).unwrap_or(&"Bangalore").to_string(),
            loss_description: LOSSES.choose(rng).unwrap_or(&LOSSES[0]).to_string(),
            claim_type: CLAIM_TYPES.choose(rng).unwrap_or(&"Own Damage").to_string(),
            estimated_amount: (rng.random_range(5_000..250_000) / 100 * 100) as f64,
        },
        claimant: FnolClaimant {
            driver_name: DRIVERS.choose(rng).unwrap_or(&"Sarah Mitchell").to_string(),
            driving_license_number: format!("DL-{:013}", rng.random_range(0..10_000_000_000_000_u64)),
            license_valid_till: (now.date_naive() + Duration::days(rng.random_range(365..3650)))
                .format("%Y-%m-%d")
                .to_string(),
        },
        documents: FnolDocuments {
            rc_copy_uploaded: true,
            dl_copy_uploaded: true,
            photos_uploaded,
            fir_uploaded: rng.random_bool(0.3),
            photos: Vec::new(),
        },
        history: FnolHistory {
            previous_claims_last_12_months: rng.random_range(0..3),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_fnol;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn demo_payloads_pass_intake_validation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let payload = demo_fnol_payload(&mut rng);
            validate_fnol(&payload).unwrap();
            assert!(payload.claim_id.starts_with("CLM-"));
            assert!(payload.incident.estimated_amount >= 5_000.0);
            assert!(payload.policy.policy_start_date < payload.policy.policy_end_date);
        }
    }

    #[test]
    fn same_seed_same_payload() {
        let a = demo_fnol_payload(&mut StdRng::seed_from_u64(42));
        let b = demo_fnol_payload(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.claim_id, b.claim_id);
        assert_eq!(a.vehicle, b.vehicle);
        assert_eq!(a.claimant.driver_name, b.claimant.driver_name);
    }
}
