/// A progress bar that tracing logs are printed above, so that logs never
/// break the bar.
#[derive(Clone)]
pub struct TracingProgressBar {
    progress: indicatif::ProgressBar,
}

impl TracingProgressBar {
    /// Creates the bar and installs the global tracing subscriber writing
    /// through it. Must be called at most once.
    pub fn init() -> Self {
        let style = indicatif::ProgressStyle::default_bar().template(
            "[{elapsed_precise}] {wide_bar:.green} {pos:>2}/{len:2} (ETA {eta}) {msg}",
        );
        let progress = indicatif::ProgressBar::new(0);
        progress.set_style(style);
        let progress = Self { progress };

        // init tracing subscriber
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(progress.clone())
            .init();

        progress
    }

    /// A bar that draws nothing and leaves tracing untouched.
    pub fn hidden() -> Self {
        Self {
            progress: indicatif::ProgressBar::hidden(),
        }
    }

    pub fn set_length(&self, len: u64) {
        self.progress.set_length(len);
    }

    pub fn set_message(&self, message: String) {
        self.progress.set_message(message);
    }

    pub fn inc(&self) {
        self.progress.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.progress.position()
    }

    pub fn finish(&self) {
        self.progress.finish();
    }
}

impl std::io::Write for TracingProgressBar {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        self.progress.println(line.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for TracingProgressBar {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
