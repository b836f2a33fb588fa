//! Line commands read from stdin.

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
	/// Replace the query text.
	Query(String),
	/// Scroll so the given row is at the top.
	Scroll(u32),
	/// Show the given number of rows.
	Resize(u32),
	/// Toggle whether search is active.
	Active(bool),
	/// Unmount and exit.
	Quit,
}

impl Input {
	/// Parses a line. Lines starting with `:` are commands; anything else,
	/// including an empty line, is query text.
	pub fn parse(line: &str) -> Result<Self, String> {
		let Some(command) = line.strip_prefix(':') else {
			return Ok(Self::Query(line.to_string()));
		};
		let mut words = command.split_whitespace();
		let name = words.next().unwrap_or_default();
		let arg = words.next();
		match (name, arg) {
			("scroll", Some(row)) => row.parse().map(Self::Scroll).map_err(|e| format!("bad row {row:?}: {e}")),
			("resize", Some(rows)) => rows.parse().map(Self::Resize).map_err(|e| format!("bad height {rows:?}: {e}")),
			("show", None) => Ok(Self::Active(true)),
			("hide", None) => Ok(Self::Active(false)),
			("quit" | "q", None) => Ok(Self::Quit),
			_ => Err(format!("unknown command :{command}")),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::Input;

	#[test]
	fn plain_lines_are_queries() {
		assert_eq!(Input::parse("rust async"), Ok(Input::Query("rust async".into())));
		assert_eq!(Input::parse(""), Ok(Input::Query(String::new())));
		assert_eq!(Input::parse("  "), Ok(Input::Query("  ".into())));
	}

	#[test]
	fn commands_parse_arguments() {
		assert_eq!(Input::parse(":scroll 12"), Ok(Input::Scroll(12)));
		assert_eq!(Input::parse(":resize 3"), Ok(Input::Resize(3)));
		assert_eq!(Input::parse(":show"), Ok(Input::Active(true)));
		assert_eq!(Input::parse(":hide"), Ok(Input::Active(false)));
		assert_eq!(Input::parse(":q"), Ok(Input::Quit));
	}

	#[test]
	fn malformed_commands_are_rejected() {
		assert!(Input::parse(":scroll").is_err());
		assert!(Input::parse(":scroll -1").is_err());
		assert!(Input::parse(":show now").is_err());
		assert!(Input::parse(":jump 3").is_err());
	}
}
