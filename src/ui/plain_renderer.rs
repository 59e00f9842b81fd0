use std::io::{IsTerminal, Write};
use std::sync::Arc;

use anstream::{AutoStream, ColorChoice};
use anstyle::Style;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::builder::Builder;
use tabled::settings::{Padding, Style as TableStyle};

use crate::ui::renderer::{Renderer, SpinnerHandle, UiResult};
use crate::ui::theme::{is_ci_environment, resolve_color_enabled, OutputMode, Theme};
use crate::ui::widgets::{KeyValue, MessageBlock, NoticeLevel, SummaryCounts, TableSpec};

pub struct PlainRenderer<W: Write> {
    writer: W,
    color_enabled: bool,
    progress_enabled: bool,
    theme: Theme,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(writer: W, color_enabled: bool) -> Self {
        Self {
            writer,
            color_enabled,
            progress_enabled: false,
            theme: Theme::default(),
        }
    }

    pub fn with_progress_enabled(mut self, enabled: bool) -> Self {
        self.progress_enabled = enabled;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn style_text(&self, style: Style, text: &str) -> String {
        if !self.color_enabled {
            return text.to_owned();
        }
        format!("{}{}{}", style.render(), text, style.render_reset())
    }

    fn write_block(&mut self, label: &str, style: Style, block: &MessageBlock) -> UiResult<()> {
        let marker = self.style_text(style, label);
        writeln!(self.writer, "{marker} {}", block.title)?;
        writeln!(self.writer, "  {}", block.body)?;
        if let Some(hint) = &block.hint {
            let hint_label = self.style_text(self.theme.muted, "hint");
            writeln!(self.writer, "  {hint_label}: {hint}")?;
        }
        Ok(())
    }
}

impl PlainRenderer<AutoStream<std::io::Stdout>> {
    pub fn stdout(mode: OutputMode) -> Self {
        let choice = match mode {
            OutputMode::Auto => ColorChoice::Auto,
            OutputMode::Always => ColorChoice::AlwaysAnsi,
            OutputMode::Never => ColorChoice::Never,
        };
        let stream = AutoStream::new(std::io::stdout(), choice);
        let color_enabled = resolve_color_enabled(mode, std::io::stdout().is_terminal());
        let progress_enabled = std::io::stdout().is_terminal() && !is_ci_environment();
        Self::new(stream, color_enabled).with_progress_enabled(progress_enabled)
    }
}

impl PlainRenderer<AutoStream<std::io::Stderr>> {
    pub fn stderr(mode: OutputMode) -> Self {
        let choice = match mode {
            OutputMode::Auto => ColorChoice::Auto,
            OutputMode::Always => ColorChoice::AlwaysAnsi,
            OutputMode::Never => ColorChoice::Never,
        };
        let stream = AutoStream::new(std::io::stderr(), choice);
        let color_enabled = resolve_color_enabled(mode, std::io::stderr().is_terminal());
        let progress_enabled = std::io::stderr().is_terminal() && !is_ci_environment();
        Self::new(stream, color_enabled).with_progress_enabled(progress_enabled)
    }
}

impl<W: Write> Renderer for PlainRenderer<W> {
    fn text(&mut self, body: &str) -> UiResult<()> {
        write!(self.writer, "{body}")?;
        if !body.ends_with('\n') {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn section(&mut self, title: &str) -> UiResult<()> {
        let rendered = self.style_text(self.theme.accent, title);
        let underline = self.style_text(self.theme.muted, &"─".repeat(title.chars().count()));
        writeln!(self.writer, "{rendered}")?;
        writeln!(self.writer, "{underline}")?;
        Ok(())
    }

    fn notice(&mut self, level: NoticeLevel, body: &str) -> UiResult<()> {
        let (label, style) = match level {
            NoticeLevel::Info => ("info", self.theme.accent),
            NoticeLevel::Success => ("ok", self.theme.success),
            NoticeLevel::Warning => ("warn", self.theme.warning),
            NoticeLevel::Error => ("error", self.theme.error),
        };
        let marker = self.style_text(style, "•");
        let label = self.style_text(self.theme.muted, label);
        writeln!(self.writer, "{marker} {label}: {body}")?;
        Ok(())
    }

    fn bullet_list(&mut self, title: &str, items: &[String]) -> UiResult<()> {
        writeln!(self.writer, "{title}:")?;
        if items.is_empty() {
            writeln!(self.writer, "- <none>")?;
            return Ok(());
        }
        for item in items {
            writeln!(self.writer, "- {item}")?;
        }
        Ok(())
    }

    fn error_block(&mut self, block: &MessageBlock) -> UiResult<()> {
        self.write_block("[error]", self.theme.error, block)
    }

    fn key_values(&mut self, items: &[KeyValue]) -> UiResult<()> {
        for item in items {
            let key = self.style_text(self.theme.label, &item.key);
            let value = self.style_text(self.theme.value, &item.value);
            writeln!(self.writer, "{key}: {value}")?;
        }
        Ok(())
    }

    fn summary(&mut self, counts: SummaryCounts) -> UiResult<()> {
        let ok = self.style_text(self.theme.success, &counts.ok.to_string());
        let warn = self.style_text(self.theme.warning, &counts.warn.to_string());
        let err = self.style_text(self.theme.error, &counts.err.to_string());
        writeln!(self.writer, "summary  ok:{ok}  warn:{warn}  err:{err}")?;
        Ok(())
    }

    fn table(&mut self, spec: &TableSpec) -> UiResult<()> {
        let rendered = render_table(spec);
        writeln!(self.writer, "{rendered}")?;
        Ok(())
    }

    fn spinner(&mut self, label: &str) -> UiResult<Box<dyn SpinnerHandle>> {
        if self.progress_enabled {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                spinner.set_style(style);
            }
            spinner.set_message(label.to_owned());
            spinner.enable_steady_tick(std::time::Duration::from_millis(80));
            return Ok(Box::new(IndicatifSpinnerHandle::new(spinner)));
        }
        let marker = self.style_text(self.theme.accent, "◌");
        writeln!(self.writer, "{marker} {label}")?;
        Ok(Box::new(NoopSpinnerHandle))
    }
}

fn render_table(spec: &TableSpec) -> String {
    let mut builder = Builder::default();
    if !spec.headers.is_empty() {
        builder.push_record(spec.headers.iter().map(String::as_str));
    }
    for row in &spec.rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    let mut table = builder.build();
    // Keep table structure clear without heavy grid chrome.
    table.with(TableStyle::blank());
    table.with(Padding::new(0, 2, 0, 0));
    table.to_string()
}

#[derive(Debug, Default)]
struct NoopSpinnerHandle;

impl SpinnerHandle for NoopSpinnerHandle {
    fn set_message(&self, _message: &str) {}

    fn finish_success(&self, _message: &str) {}

    fn finish_error(&self, _message: &str) {}
}

#[derive(Debug, Clone)]
struct IndicatifSpinnerHandle {
    progress: Arc<ProgressBar>,
}

impl IndicatifSpinnerHandle {
    fn new(progress: ProgressBar) -> Self {
        Self {
            progress: Arc::new(progress),
        }
    }
}

impl SpinnerHandle for IndicatifSpinnerHandle {
    fn set_message(&self, message: &str) {
        self.progress.set_message(message.to_owned());
    }

    fn finish_success(&self, message: &str) {
        self.progress.finish_with_message(message.to_owned());
    }

    fn finish_error(&self, message: &str) {
        self.progress.abandon_with_message(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::renderer::Renderer;

    #[test]
    fn renders_blocks_without_color_when_disabled() {
        let mut renderer = PlainRenderer::new(Vec::<u8>::new(), false);

        renderer
            .error_block(
                &MessageBlock::new("Check failed", "ufw is not installed")
                    .with_hint("Install it from the packages menu"),
            )
            .expect("render error block");

        let rendered = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert_eq!(
            rendered,
            "[error] Check failed\n  ufw is not installed\n  hint: Install it from the packages menu\n"
        );
    }

    #[test]
    fn renders_section_and_summary_without_color_when_disabled() {
        let mut renderer = PlainRenderer::new(Vec::<u8>::new(), false);

        renderer.section("Managed Services").expect("section");
        renderer
            .summary(SummaryCounts {
                ok: 4,
                warn: 1,
                err: 0,
            })
            .expect("summary");

        let rendered = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert_eq!(
            rendered,
            "Managed Services\n────────────────\nsummary  ok:4  warn:1  err:0\n"
        );
    }

    #[test]
    fn spinner_falls_back_to_step_output_when_progress_disabled() {
        let mut renderer = PlainRenderer::new(Vec::<u8>::new(), false).with_progress_enabled(false);

        let spinner = renderer.spinner("Probing services").expect("spinner");
        spinner.set_message("Still probing");
        spinner.finish_success("Done");

        let rendered = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert_eq!(rendered, "◌ Probing services\n");
    }

    #[test]
    fn renders_bullet_list_and_table_without_color_when_disabled() {
        let mut renderer = PlainRenderer::new(Vec::<u8>::new(), false);
        renderer
            .bullet_list(
                "config",
                &[
                    "port: 3306".to_owned(),
                    "bind-address: 127.0.0.1".to_owned(),
                ],
            )
            .expect("bullet list");
        renderer
            .table(&TableSpec::new(
                vec!["service".to_owned(), "state".to_owned()],
                vec![vec!["nginx".to_owned(), "active".to_owned()]],
            ))
            .expect("table");

        let rendered = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert!(rendered.contains("config:\n- port: 3306"));
        assert!(rendered.contains("service"));
        assert!(rendered.contains("nginx"));
        assert!(rendered.contains("active"));
    }
}
