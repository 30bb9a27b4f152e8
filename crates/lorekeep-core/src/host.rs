/// Environment variable that overrides the machine identifier
pub const MACHINE_ENV: &str = "LOREKEEP_MACHINE";

const UNKNOWN_MACHINE: &str = "unknown";

/// Resolve the identifier stamped on learnings headings:
/// 1. explicit value (config file)
/// 2. LOREKEEP_MACHINE environment variable
/// 3. Host name, cut at the first '.'
/// 4. "unknown"
pub fn machine_name(explicit: Option<&str>) -> String {
    if let Some(name) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return name.to_string();
    }

    if let Ok(name) = std::env::var(MACHINE_ENV) {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    hostname()
        .map(|h| short_host_name(&h))
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| UNKNOWN_MACHINE.to_string())
}

/// `build-01.corp.example.com` -> `build-01`
pub fn short_host_name(host: &str) -> String {
    host.trim().split('.').next().unwrap_or_default().to_string()
}

#[cfg(unix)]
pub fn hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY: buf is valid for buf.len() bytes; gethostname NUL-terminates on success
    // when the name fits, and we bound the read by the buffer length otherwise.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8(buf[..end].to_vec())
        .ok()
        .filter(|s| !s.is_empty())
}

#[cfg(not(unix))]
pub fn hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok().filter(|s| !s.is_empty())
}
