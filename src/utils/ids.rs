use anyhow::{Result, bail};
use moments_core::store::Record;

/// Full id from an id or a unique id prefix as shown in listings.
pub fn resolve_id<T: Record>(records: &[T], prefix: &str) -> Result<String> {
    let matches: Vec<&T> = records.iter().filter(|r| r.id().starts_with(prefix)).collect();

    match matches.as_slice() {
        [one] => Ok(one.id().to_string()),
        [] => bail!("No {} record with id {}", T::COLLECTION, prefix),
        _ => bail!(
            "Id {} matches {} {} records, use more characters",
            prefix,
            matches.len(),
            T::COLLECTION
        ),
    }
}
