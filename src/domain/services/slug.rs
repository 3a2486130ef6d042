use crate::domain::ports::SlugLookup;
use crate::domain::services::normalize::slugify;
use crate::error::AppError;
use chrono::Utc;
use tracing::debug;

const MAX_SUFFIX: u32 = 10_000;

/// Finds the first free slug for `title`: `base`, then `base-1`, `base-2`, ...
///
/// The result is only free at the time of the check. Callers writing it must
/// treat a unique-constraint rejection as a reason to allocate again.
pub async fn allocate_slug<L>(title: &str, exclude_id: Option<&str>, lookup: &L) -> Result<String, AppError>
where
    L: SlugLookup + ?Sized,
{
    let base = base_slug(title);

    if !lookup.slug_exists(&base, exclude_id).await? {
        return Ok(base);
    }

    for suffix in 1..=MAX_SUFFIX {
        let candidate = format!("{}-{}", base, suffix);
        if !lookup.slug_exists(&candidate, exclude_id).await? {
            debug!(base = %base, candidate = %candidate, "slug collision resolved with suffix");
            return Ok(candidate);
        }
    }

    Err(AppError::Conflict(format!("No free slug found for '{}'", base)))
}

fn base_slug(title: &str) -> String {
    let base = slugify(title);
    if base.is_empty() {
        format!("untitled-{}", to_base36(Utc::now().timestamp_millis().unsigned_abs()))
    } else {
        base
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
