//! 命令行交互

use crate::error::{Result, UpdaterError};
use crate::formats::settings::is_stag_directory;
use std::io::{BufRead, StdinLock, Stdout, Write};
use std::path::PathBuf;

const INVALID_ANSWER: &str = "Neplatná odpověď. (Y-ano/N-ne)";
const DIRECTORY_QUESTION: &str = "Vložte cestu ke složce se Stag (složka se stag.exe):";
const INVALID_DIRECTORY: &str =
    "Byla zadána špatná cesta, ujistěte se, že jste zadali cestu ke složce s programem stag.exe";

/// 交互式提问
pub struct Prompter<R, W> {
    input: R,
    output: W,
    /// 所有是/否问题自动回答“是”
    assume_yes: bool,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// 使用标准输入输出
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout(), assume_yes)
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }

    /// 读取一行，输入结束时返回 `None`
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// 是/否问题，输入结束视为“否”
    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        if self.assume_yes {
            writeln!(self.output, "{question} Y")?;
            return Ok(true);
        }

        loop {
            write!(self.output, "{question} ")?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(false);
            };

            match parse_yes_no(&answer) {
                Some(value) => return Ok(value),
                None => writeln!(self.output, "{INVALID_ANSWER}")?,
            }
        }
    }

    /// 反复询问 STAG 目录，直到路径有效并经用户确认
    pub fn ask_directory(&mut self) -> Result<PathBuf> {
        loop {
            write!(self.output, "{DIRECTORY_QUESTION} ")?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                return Err(UpdaterError::InvalidDirectory(PathBuf::new()));
            };
            let dir = PathBuf::from(answer.trim_matches('"'));

            if !is_stag_directory(&dir) {
                writeln!(self.output, "{INVALID_DIRECTORY}")?;
                continue;
            }

            let question = format!("Je složka se Stag: {} správná? (Y/N)", dir.display());
            if self.ask_yes_no(&question)? {
                return Ok(dir);
            }
        }
    }
}

/// 识别回答：Y/yes/A/ano 与 N/no/ne
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" | "a" | "ano" => Some(true),
        "n" | "no" | "ne" => Some(false),
        _ => None,
    }
}
