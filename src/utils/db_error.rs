/// Name of the unique index guarding `shorturls.name`.
pub const NAME_CONSTRAINT: &str = "shorturls_name_key";

pub fn is_unique_violation_on_name(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(NAME_CONSTRAINT))
}
