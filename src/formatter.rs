use crate::cli::OutputFormat;

/// Renders one selected file into the final prompt text.
pub trait Formatter {
    fn format_text_file(&self, path: &str, content: &str) -> String;
    fn format_binary_file(&self, path: &str) -> String;
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_text_file(&self, path: &str, content: &str) -> String {
        format!("## {path}\n```\n{content}\n```\n")
    }

    fn format_binary_file(&self, path: &str) -> String {
        format!("## {path}\n<binary-file/>\n")
    }
}

pub struct XmlFormatter;

impl Formatter for XmlFormatter {
    fn format_text_file(&self, path: &str, content: &str) -> String {
        format!("<file path='{path}'>\n{}\n</file>\n", escape_xml_text(content))
    }

    fn format_binary_file(&self, path: &str) -> String {
        format!("<file path='{path}' is_binary='true'><binary-file/></file>\n")
    }
}

fn escape_xml_text(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn formatter_for(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
        OutputFormat::Xml => Box::new(XmlFormatter),
    }
}
