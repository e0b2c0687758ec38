//! Best-effort telemetry headers and credential sanity checks.

/// Header carrying the SDK name and version.
pub const SDK_HEADER: &str = "Upstash-Telemetry-Sdk";
/// Header carrying the hosting platform.
pub const PLATFORM_HEADER: &str = "Upstash-Telemetry-Platform";
/// Header carrying the language runtime.
pub const RUNTIME_HEADER: &str = "Upstash-Telemetry-Runtime";

/// SDK identifier sent in [`SDK_HEADER`].
pub const SDK_VERSION: &str = concat!("quiver-rs@", env!("CARGO_PKG_VERSION"));

/// Telemetry headers describing this process.
pub fn telemetry_headers() -> Vec<(&'static str, String)> {
    vec![
        (SDK_HEADER, SDK_VERSION.to_string()),
        (PLATFORM_HEADER, platform().to_string()),
        (RUNTIME_HEADER, runtime()),
    ]
}

fn platform() -> &'static str {
    platform_from(|key| std::env::var_os(key).is_some())
}

fn platform_from(is_set: impl Fn(&str) -> bool) -> &'static str {
    if is_set("VERCEL") {
        "vercel"
    } else if is_set("AWS_REGION") {
        "aws"
    } else {
        "unknown"
    }
}

/// Reports the crate's minimum supported Rust version, not the running toolchain.
fn runtime() -> String {
    let msrv = env!("CARGO_PKG_RUST_VERSION");
    if msrv.is_empty() {
        "rust".to_string()
    } else {
        format!("rust-msrv@{}", msrv)
    }
}

/// True if a credential has leading/trailing spaces or embedded newlines.
pub fn is_malformed_credential(value: &str) -> bool {
    value.starts_with(' ') || value.ends_with(' ') || value.contains(['\r', '\n'])
}

/// Log a warning for a malformed credential. Never fails.
pub fn warn_if_malformed(name: &str, value: &str) {
    if is_malformed_credential(value) {
        tracing::warn!(
            target: "quiver::config",
            credential = name,
            "The vector {} contains whitespace or newline, which can cause errors!",
            name
        );
    }
}
