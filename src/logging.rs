//! ログ初期化
//!
//! `--verbose` なら常に debug。それ以外は `RUST_LOG` を優先し、
//! なければ設定のレベルを使う

use tracing_subscriber::EnvFilter;

/// グローバルなtracingサブスクライバを初期化
pub fn init_logging(level: &str, verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(level, verbose, rust_log.as_deref());

    // 二重初期化（テストなど）は無視する
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// フィルタを決める（verbose > RUST_LOG > 設定）
///
/// 不正な `RUST_LOG` は無視して設定のレベルを使う
fn build_filter(level: &str, verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_rust_log() {
        let filter = build_filter("info", true, Some("warn,hyper=error"));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_rust_log_overrides_config_level() {
        let filter = build_filter("info", false, Some("warn"));
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_config_level_without_rust_log() {
        assert_eq!(build_filter("trace", false, None).to_string(), "trace");
    }

    #[test]
    fn test_invalid_rust_log_falls_back() {
        let filter = build_filter("info", false, Some("hyper=loud"));
        assert_eq!(filter.to_string(), "info");
    }
}
