//! Identity-provider subject ids (`auth0|…`) mapped onto storage UUIDs.

use uuid::Uuid;

/// Fixed namespace for subject-id UUIDs. Changing it orphans every stored row.
pub const SUBJECT_NAMESPACE: Uuid = Uuid::from_u128(0x9f9b2131_d4d9_4c04_8a0c_b1d0fd064abe);

/// Deterministic UUID v5 of the subject string.
pub fn auth0_id_to_uuid(subject: &str) -> Uuid {
    Uuid::new_v5(&SUBJECT_NAMESPACE, subject.as_bytes())
}
