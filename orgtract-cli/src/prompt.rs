//! Operator prompts for missing `predict` options

use std::io::{BufRead, Write};

use crate::output::format_error;
use crate::table::{parse_separator, SEPARATORS};

fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>, String> {
    let mut line = String::new();
    let n = input
        .read_line(&mut line)
        .map_err(|e| format_error("read answer", &e.to_string()))?;
    Ok((n > 0).then(|| line.trim().to_string()))
}

fn write_prompt<W: Write>(output: &mut W, text: &str) -> Result<(), String> {
    write!(output, "{}", text)
        .and_then(|_| output.flush())
        .map_err(|e| format_error("write prompt", &e.to_string()))
}

/// Ask for the CSV separator until a valid one is given.
pub fn choose_separator<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<u8, String> {
    let names: Vec<&str> = SEPARATORS.iter().map(|(name, _)| *name).collect();
    loop {
        write_prompt(
            output,
            &format!("\nCSV separator [{} or a single character]: ", names.join(", ")),
        )?;
        let Some(answer) = read_answer(input)? else {
            return Err("no separator given".to_string());
        };
        match parse_separator(&answer) {
            Ok(sep) => return Ok(sep),
            Err(e) => write_prompt(output, &format!("{}\n", e))?,
        }
    }
}

/// Ask which column holds the source text. A single column is chosen without asking.
pub fn choose_column<R: BufRead, W: Write>(
    question: &str,
    columns: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<usize, String> {
    match columns.len() {
        0 => return Err("no columns available for selection".to_string()),
        1 => return Ok(0),
        _ => {}
    }

    let mut menu = format!("\n{}:\n", question);
    for (i, column) in columns.iter().enumerate() {
        menu.push_str(&format!("  [{}] {}\n", i + 1, column));
    }
    loop {
        write_prompt(output, &format!("{}> ", menu))?;
        let Some(answer) = read_answer(input)? else {
            return Err("no column selected".to_string());
        };
        if let Ok(n) = answer.parse::<usize>() {
            if (1..=columns.len()).contains(&n) {
                return Ok(n - 1);
            }
        }
        if let Some(i) = columns.iter().position(|c| c.trim() == answer) {
            return Ok(i);
        }
        write_prompt(output, &format!("'{}' is not one of the columns\n", answer))?;
    }
}

/// Ask for the output column name; a blank answer keeps `default`.
pub fn choose_output_column<R: BufRead, W: Write>(
    default: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String, String> {
    write_prompt(
        output,
        &format!("\nOutput column name (default: {}): ", default),
    )?;
    Ok(match read_answer(input)? {
        Some(answer) if !answer.is_empty() => answer.to_uppercase(),
        _ => default.to_string(),
    })
}
