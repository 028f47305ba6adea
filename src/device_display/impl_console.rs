use crate::device_display::interface::DeviceDisplay;
use std::error::Error;
use std::io::Write;

pub struct DeviceDisplayConsole {
    width: usize,
}

impl DeviceDisplayConsole {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    fn border(&self, left: char, right: char) -> String {
        format!("{}{}{}", left, "─".repeat(self.width), right)
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout)?;
        Ok(())
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut stdout = std::io::stdout().lock();

        writeln!(stdout, "{}", self.border('┌', '┐'))?;
        for line in lines {
            let text: String = line.chars().take(self.width).collect();
            let padding = self.width - text.chars().count();
            writeln!(stdout, "│{}{}│", text, " ".repeat(padding))?;
        }
        writeln!(stdout, "{}", self.border('└', '┘'))?;
        stdout.flush()?;

        Ok(())
    }
}
