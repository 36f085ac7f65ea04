//! Best-effort User-Agent summarisation for session listings and login alerts.

pub const UNKNOWN_DEVICE: &str = "Unknown Device";

/// Summarise a User-Agent as "Vendor Model · OS · Browser".
///
/// Segments that cannot be recognised are omitted; if none are, returns
/// [`UNKNOWN_DEVICE`].
pub fn describe_device(user_agent: Option<&str>) -> String {
    let Some(ua) = user_agent.filter(|ua| !ua.trim().is_empty()) else {
        return UNKNOWN_DEVICE.to_owned();
    };
    let parts: Vec<String> = [hardware(ua), os(ua), browser(ua)]
        .into_iter()
        .flatten()
        .collect();
    if parts.is_empty() {
        UNKNOWN_DEVICE.to_owned()
    } else {
        parts.join(" · ")
    }
}

fn hardware(ua: &str) -> Option<String> {
    if ua.contains("iPhone") {
        return Some("Apple iPhone".to_owned());
    }
    if ua.contains("iPad") {
        return Some("Apple iPad".to_owned());
    }
    if ua.contains("Macintosh") {
        return Some("Apple Macintosh".to_owned());
    }
    if ua.contains("Android") {
        // "Linux; Android 14; Pixel 8 Build/UQ1A" → "Pixel 8"
        let platform = ua.split_once('(')?.1.split_once(')')?.0;
        let model = platform
            .split(';')
            .map(str::trim)
            .find(|s| is_android_model(s))?;
        let model = model.split(" Build/").next().unwrap_or(model).trim();
        return (!model.is_empty()).then(|| model.to_owned());
    }
    None
}

fn is_android_model(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with("Linux")
        && !segment.starts_with("Android")
        && !matches!(segment, "U" | "K" | "wv")
}

fn os(ua: &str) -> Option<String> {
    if let Some(v) = version_after(ua, "iPhone OS ").or_else(|| version_after(ua, "CPU OS ")) {
        return Some(format!("iOS {}", v.replace('_', ".")));
    }
    if let Some(v) = version_after(ua, "Android ") {
        return Some(format!("Android {v}"));
    }
    if let Some(v) = version_after(ua, "Windows NT ") {
        let name = match v.as_str() {
            "10.0" => "10",
            "6.3" => "8.1",
            "6.2" => "8",
            "6.1" => "7",
            other => other,
        };
        return Some(format!("Windows {name}"));
    }
    if let Some(v) = version_after(ua, "Mac OS X ") {
        return Some(format!("macOS {}", v.replace('_', ".")));
    }
    if ua.contains("CrOS") {
        return Some("ChromeOS".to_owned());
    }
    if ua.contains("Linux") {
        return Some("Linux".to_owned());
    }
    None
}

fn browser(ua: &str) -> Option<String> {
    // Order matters: Edge and Opera also advertise Chrome, Chrome advertises Safari.
    const MARKERS: [(&str, &str); 6] = [
        ("Edg/", "Edge"),
        ("OPR/", "Opera"),
        ("Firefox/", "Firefox"),
        ("FxiOS/", "Firefox"),
        ("CriOS/", "Chrome"),
        ("Chrome/", "Chrome"),
    ];
    for (marker, name) in MARKERS {
        if let Some(v) = version_after(ua, marker) {
            return Some(format!("{name} {}", major(&v)));
        }
    }
    if ua.contains("Safari/") {
        return Some(match version_after(ua, "Version/") {
            Some(v) => format!("Safari {v}"),
            None => "Safari".to_owned(),
        });
    }
    None
}

fn version_after(ua: &str, marker: &str) -> Option<String> {
    let rest = &ua[ua.find(marker)? + marker.len()..];
    let version: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '_')
        .collect();
    let version = version.trim_end_matches(['.', '_']).to_owned();
    (!version.is_empty()).then_some(version)
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}
