//! Organizational time-zone resolution and local formatting.
//!
//! Board listings show creation times in the organization's wall-clock time,
//! not the stored absolute instant. The zone id is configuration; when the
//! runtime does not recognize it the resolution falls back through
//! `Asia/Seoul` and finally a fixed `+09:00` offset, preserving the
//! original deployment's default chain.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use chrono_tz::Tz;

/// Default organizational time zone (Korea Standard Time).
pub const DEFAULT_ZONE_ID: &str = "Asia/Seoul";

/// KST offset in seconds, the last-resort fallback.
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Resolved organizational time zone.
///
/// Cheap to copy; resolve once from configuration and reuse per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgTimeZone {
    /// A named IANA zone recognized by the runtime.
    Named(Tz),
    /// Fixed-offset fallback when no zone id could be resolved.
    Fixed(FixedOffset),
}

impl OrgTimeZone {
    /// Resolve a zone id, falling back through the documented chain.
    ///
    /// 1. the configured id, if the runtime knows it;
    /// 2. [`DEFAULT_ZONE_ID`] (`Asia/Seoul`);
    /// 3. a fixed `+09:00` offset.
    ///
    /// # Examples
    ///
    /// ```
    /// use vidimus_core::time::OrgTimeZone;
    ///
    /// let tz = OrgTimeZone::resolve("Europe/Berlin");
    /// let fallback = OrgTimeZone::resolve("Not/AZone");
    /// assert_ne!(tz, fallback);
    /// ```
    pub fn resolve(zone_id: &str) -> Self {
        if let Ok(tz) = zone_id.parse::<Tz>() {
            return OrgTimeZone::Named(tz);
        }
        log::warn!("unrecognized time zone id '{zone_id}', falling back to {DEFAULT_ZONE_ID}");
        if let Ok(tz) = DEFAULT_ZONE_ID.parse::<Tz>() {
            return OrgTimeZone::Named(tz);
        }
        // Unreachable with a bundled tz database, but the chain is total.
        OrgTimeZone::Fixed(fixed_kst())
    }

    /// The default organizational zone.
    pub fn default_zone() -> Self {
        Self::resolve(DEFAULT_ZONE_ID)
    }

    /// Format an absolute instant as a local calendar string,
    /// `YYYY-MM-DD HH:mm`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use vidimus_core::time::OrgTimeZone;
    ///
    /// let instant = Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap();
    /// let tz = OrgTimeZone::resolve("Asia/Seoul");
    /// assert_eq!(tz.format_local(instant), "2024-03-02 00:30");
    /// ```
    pub fn format_local(&self, instant: DateTime<Utc>) -> String {
        const FMT: &str = "%Y-%m-%d %H:%M";
        match self {
            OrgTimeZone::Named(tz) => instant.with_timezone(tz).format(FMT).to_string(),
            OrgTimeZone::Fixed(offset) => instant.with_timezone(offset).format(FMT).to_string(),
        }
    }
}

impl Default for OrgTimeZone {
    fn default() -> Self {
        Self::default_zone()
    }
}

fn fixed_kst() -> FixedOffset {
    // +09:00 is always representable.
    FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_resolve_named_zone() {
        let tz = OrgTimeZone::resolve("Asia/Seoul");
        assert!(matches!(tz, OrgTimeZone::Named(_)));
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_seoul() {
        let tz = OrgTimeZone::resolve("Corp/Headquarters");
        assert_eq!(tz, OrgTimeZone::resolve(DEFAULT_ZONE_ID));
    }

    #[test]
    fn test_format_local_kst() {
        let tz = OrgTimeZone::resolve("Asia/Seoul");
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap();
        // KST is UTC+9, no DST.
        assert_eq!(tz.format_local(instant), "2024-03-02 00:30");
    }

    #[test]
    fn test_format_local_other_zone() {
        let tz = OrgTimeZone::resolve("America/New_York");
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 3, 5, 0).unwrap();
        // EST is UTC-5 in January.
        assert_eq!(tz.format_local(instant), "2024-01-14 22:05");
    }

    #[test]
    fn test_fixed_fallback_formats() {
        let tz = OrgTimeZone::Fixed(fixed_kst());
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(tz.format_local(instant), "2024-06-01 09:00");
    }
}
