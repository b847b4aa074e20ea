//! Interactive device selection.

use std::io::{BufRead, Write};

use crate::error::PromptError;

/// Reads lines from `input` until one holds an index in `0..count`.
///
/// Every read consumes a whole line, so a malformed entry is discarded
/// before the operator is asked again.
pub fn prompt_selection<R, W>(
   count: usize,
   input: &mut R,
   output: &mut W,
) -> Result<usize, PromptError>
where
   R: BufRead,
   W: Write,
{
   if count == 0 {
      return Err(PromptError::NoChoices);
   }

   let mut line = String::new();
   loop {
      write!(output, "> ")?;
      output.flush()?;

      line.clear();
      if input.read_line(&mut line)? == 0 {
         return Err(PromptError::InputClosed);
      }

      match line.trim().parse::<usize>() {
         Ok(index) if index < count => return Ok(index),
         Ok(index) => writeln!(
            output,
            "No device {index}, please enter a number between 0 and {}",
            count - 1
         )?,
         Err(_) => writeln!(output, "Invalid input, please enter a number")?,
      }
   }
}
