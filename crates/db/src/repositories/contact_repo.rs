//! Read-only repository for host-owned contact data.

use sqlx::PgPool;

use crate::models::contact::Contact;

/// Resolves channel endpoints to contacts. This service never writes
/// contact data; the host platform owns it.
pub struct ContactRepo;

impl ContactRepo {
    /// Resolve a backend + identity pair to its contact, if the channel
    /// is connected to one.
    pub async fn resolve(
        pool: &PgPool,
        backend: &str,
        identity: &str,
    ) -> Result<Option<Contact>, sqlx::Error> {
        sqlx::query_as::<_, Contact>(
            "SELECT c.id, c.first_name, c.last_name, c.location, c.created_at \
             FROM contact_connections cc \
             JOIN contacts c ON c.id = cc.contact_id \
             WHERE cc.backend = $1 AND cc.identity = $2",
        )
        .bind(backend)
        .bind(identity)
        .fetch_optional(pool)
        .await
    }
}
