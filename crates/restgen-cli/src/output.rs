// Output formatting and styling

use colored::Colorize;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Style that never emits escape codes
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            msg.green().bold().to_string()
        } else {
            msg.to_string()
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "error:".red().bold(), msg)
        } else {
            format!("error: {}", msg)
        }
    }
}

/// Print success message
pub fn print_success(msg: &str) {
    let style = OutputStyle::default();
    println!("{}", style.success(msg));
}

/// Print error message to stderr
pub fn print_error(msg: &str) {
    let style = OutputStyle {
        use_colors: atty::is(atty::Stream::Stderr),
    };
    eprintln!("{}", style.error(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_error_prefix() {
        let style = OutputStyle::plain();
        assert_eq!(style.error("boom"), "error: boom");
    }

    #[test]
    fn test_plain_success_is_unchanged() {
        let style = OutputStyle::plain();
        assert_eq!(style.success("Completed successfully."), "Completed successfully.");
    }

    #[test]
    fn test_colored_error_keeps_message() {
        let style = OutputStyle { use_colors: true };
        assert!(style.error("boom").ends_with("boom"));
    }
}
