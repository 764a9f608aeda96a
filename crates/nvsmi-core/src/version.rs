/// Driver version split into the three exported components.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DriverVersion {
    pub major: String,
    pub minor: String,
    pub patch: String,
}

impl DriverVersion {
    fn zero() -> Self {
        Self {
            major: "0".to_string(),
            minor: "0".to_string(),
            patch: "0".to_string(),
        }
    }
}

/// Split an already-coerced version string on `.` into major/minor/patch.
///
/// Fewer than two segments yields all zeros; a missing patch is `"0"`; extra
/// segments are dropped. Only the patch is re-rendered as an integer
/// (`"03"` -> `"3"`, unparsable -> `"0"`). Major and minor go out as written,
/// which keeps existing dashboards stable.
pub fn decompose_version(version: &str) -> DriverVersion {
    let segments: Vec<&str> = version.split('.').collect();

    match segments.as_slice() {
        [] | [_] => DriverVersion::zero(),
        [major, minor] => DriverVersion {
            major: major.to_string(),
            minor: minor.to_string(),
            patch: "0".to_string(),
        },
        [major, minor, patch, ..] => DriverVersion {
            major: major.to_string(),
            minor: minor.to_string(),
            patch: normalize_patch(patch),
        },
    }
}

fn normalize_patch(patch: &str) -> String {
    patch.parse::<i64>().unwrap_or(0).to_string()
}
