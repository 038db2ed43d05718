use crate::config::{LoggingConfig, Section};
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

// -------- level helpers --------

/// `None` means the sink is switched off. Unknown names fall back to INFO.
fn parse_tracing_level(s: &str) -> Option<Level> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("off") || s.eq_ignore_ascii_case("none") {
        return None;
    }
    Some(s.parse::<Level>().unwrap_or(Level::INFO))
}

fn level_filter(s: &str) -> LevelFilter {
    parse_tracing_level(s).map_or(LevelFilter::OFF, LevelFilter::from_level)
}

/// `marketplace` owns `marketplace` and `marketplace::*`, never `marketplace_x`.
fn target_belongs_to(target: &str, section: &str) -> bool {
    target
        .strip_prefix(section)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendCount>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriter;
    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log writer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log writer poisoned"))?
            .flush()
    }
}

/// Relative log files live under `base_dir` (the resolved home dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    base_dir.join(file)
}

fn open_rotating_writer(path: &Path, max_bytes: usize, keep: usize) -> std::io::Result<RotWriter> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rotate = FileRotate::new(
        path,
        AppendCount::new(keep),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rotate))))
}

/// A section with a blank `file` has no file sink. Open failures are reported
/// on stderr and only disable that one sink.
fn writer_for_section(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    let file = section.file.trim();
    if file.is_empty() {
        return None;
    }
    let path = resolve_log_path(file, base_dir);
    let max_bytes = section.max_size_mb.unwrap_or(20).saturating_mul(1024 * 1024);
    let keep = section.max_backups.unwrap_or(3);

    open_rotating_writer(&path, usize::try_from(max_bytes).unwrap_or(usize::MAX), keep)
        .map_err(|e| eprintln!("log file for '{name}' unavailable at {}: {e}", path.display()))
        .ok()
}

// -------- layer assembly --------

/// Console filter: explicit subsystems get their own level, everything else
/// falls back to the "default" section (or OFF when there is none).
fn console_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get("default")
        .map(|s| level_filter(&s.console_level))
        .unwrap_or(LevelFilter::OFF);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != "default")
        .fold(Targets::new().with_default(default), |t, (name, s)| {
            t.with_target(name.clone(), level_filter(&s.console_level))
        })
}

fn named_sections(cfg: &LoggingConfig) -> Vec<String> {
    cfg.keys().filter(|k| k.as_str() != "default").cloned().collect()
}

fn file_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let excluded = named_sections(cfg);
    let mut layers = Vec::new();

    for (name, section) in cfg {
        let Some(writer) = writer_for_section(name, section, base_dir) else {
            continue;
        };
        let json = fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(writer);

        let max = level_filter(&section.file_level);
        if name == "default" {
            let excluded = excluded.clone();
            let filter = FilterFn::new(move |meta: &tracing::Metadata<'_>| {
                !excluded
                    .iter()
                    .any(|c| target_belongs_to(meta.target(), c))
                    && max >= *meta.level()
            });
            layers.push(json.with_filter(filter).boxed());
        } else {
            let targets = Targets::new().with_target(name.clone(), max);
            layers.push(json.with_filter(targets).boxed());
        }
    }
    layers
}

/// Initialize logging from a configuration.
/// - `cfg`: subsystem → section map ("default" is the catch-all)
/// - `base_dir`: resolves relative log file paths (usually storage.home_dir)
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(std::io::stderr)
            .try_init();
        return;
    }

    let console = fmt::layer()
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .with_filter(console_targets(cfg))
        .boxed();

    let mut layers = vec![console];
    layers.extend(file_layers(cfg, base_dir));

    let _ = Registry::default().with(layers).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn test_level_names_are_case_insensitive() {
        for (raw, expected) in [
            ("trace", Some(Level::TRACE)),
            ("DEBUG", Some(Level::DEBUG)),
            (" warn ", Some(Level::WARN)),
            ("Error", Some(Level::ERROR)),
            ("OFF", None),
            ("none", None),
            ("chatty", Some(Level::INFO)),
        ] {
            assert_eq!(parse_tracing_level(raw), expected, "{raw}");
        }
        assert_eq!(level_filter("off"), LevelFilter::OFF);
        assert_eq!(level_filter("debug"), LevelFilter::DEBUG);
    }

    #[test]
    fn test_section_owns_its_module_tree() {
        assert!(target_belongs_to("marketplace", "marketplace"));
        assert!(target_belongs_to("marketplace::domain::shell", "marketplace"));
        assert!(!target_belongs_to("marketplace_extra", "marketplace"));
        assert!(!target_belongs_to("ptj", "marketplace"));
    }

    #[test]
    fn test_named_sections_exclude_default() {
        let mut cfg = default_logging_config();
        cfg.insert("marketplace".into(), section("debug", "", "off"));

        assert_eq!(named_sections(&cfg), vec!["marketplace".to_string()]);
    }

    #[test]
    fn test_log_paths_relative_to_home() {
        let tmp = tempdir().unwrap();
        assert_eq!(
            resolve_log_path("logs/ptj.log", tmp.path()),
            tmp.path().join("logs").join("ptj.log")
        );

        let abs = tmp.path().join("abs.log");
        assert_eq!(resolve_log_path(&abs.to_string_lossy(), Path::new("/elsewhere")), abs);
    }

    #[test]
    fn test_rotating_writer_creates_missing_dirs() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("nested/dir/app.log");

        let mut writer = open_rotating_writer(&p, 128 * 1024, 2).unwrap();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&p).unwrap(), "hello\n");
    }

    #[test]
    fn test_file_layers_skip_empty_paths() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert("default".into(), section("info", "", "debug"));
        cfg.insert("marketplace".into(), section("info", "logs/market.log", "debug"));

        let layers = file_layers(&cfg, tmp.path());

        assert_eq!(layers.len(), 1);
        assert!(tmp.path().join("logs").is_dir());
    }
}
