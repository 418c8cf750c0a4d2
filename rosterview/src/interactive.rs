//! Prompt loop: repeated lookups against a roster file that may change underneath

use crate::formatter::{self, Report};
use crate::{OutputFormat, select_date, select_person, source_name};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::*;
use roster_core::{Roster, RosterConfig, ScheduleCache};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, error};

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Lookup {
        person: Option<String>,
        date: Option<NaiveDate>,
        week: bool,
    },
    People,
    Help,
    Quit,
}

/// Parse a prompt line. Known person codes take precedence over keywords.
fn parse_command(line: &str, people: &[String]) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(Command::Lookup {
            person: None,
            date: None,
            week: false,
        });
    };
    let is_person = people.iter().any(|p| p == first);

    let (week, mut rest): (bool, Vec<&str>) = match first.to_lowercase().as_str() {
        _ if is_person => (false, std::iter::once(first).chain(words).collect()),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "people" => return Ok(Command::People),
        "help" | "?" => return Ok(Command::Help),
        "week" => (true, words.collect()),
        _ => (false, std::iter::once(first).chain(words).collect()),
    };

    let mut date = None;
    if let Some(last) = rest.last() {
        if let Ok(parsed) = last.parse::<NaiveDate>() {
            date = Some(parsed);
            rest.pop();
        }
    }

    match rest.as_slice() {
        [] => Ok(Command::Lookup {
            person: None,
            date,
            week,
        }),
        [person] => Ok(Command::Lookup {
            person: Some(person.to_string()),
            date,
            week,
        }),
        _ => Err(format!(
            "Could not understand '{}'. Type 'help' for usage.",
            line.trim()
        )),
    }
}

fn write_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "  <PERSON> [YYYY-MM-DD]       assignments for a date and the next day")?;
    writeln!(out, "  week [PERSON] [YYYY-MM-DD]  also show the Monday-Sunday table")?;
    writeln!(out, "  people                      list known people")?;
    writeln!(out, "  quit                        leave")
}

/// Whether the prompt keeps going after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Prompt state: the roster file, its latest load and the selected person
pub struct Session<'a> {
    path: &'a Path,
    source: String,
    config: RosterConfig,
    cache: &'a mut ScheduleCache,
    roster: Roster,
    person: String,
    format: OutputFormat,
}

impl<'a> Session<'a> {
    /// Load the roster file and pick the starting person
    pub fn open(
        path: &'a Path,
        config: RosterConfig,
        cache: &'a mut ScheduleCache,
        person: Option<&str>,
        format: OutputFormat,
    ) -> Result<Self> {
        let schedule = cache
            .load_file(path, &config)
            .with_context(|| format!("Could not read the roster file: {}", path.display()))?;
        let roster = Roster::new(config.clone(), schedule);
        let person = select_person(&roster, person)?;

        Ok(Self {
            path,
            source: source_name(path),
            config,
            cache,
            roster,
            person,
            format,
        })
    }

    fn prompt(&self) -> ColoredString {
        format!("[{}]>", self.person).cyan()
    }

    /// Pick up edits to the file; unchanged content comes from the cache
    fn reload(&mut self) {
        match self.cache.load_file(self.path, &self.config) {
            Ok(schedule) => self.roster = Roster::new(self.config.clone(), schedule),
            Err(e) => error!("{:#}; keeping the previously loaded roster", e),
        }
        let (hits, misses) = self.cache.stats();
        debug!(hits, misses, "schedule cache");
    }

    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let (person, date, week) = match parse_command(line, &self.config.people) {
            Ok(Command::Quit) => return Ok(Flow::Quit),
            Ok(Command::Help) => {
                write_help(out)?;
                return Ok(Flow::Continue);
            }
            Ok(Command::People) => {
                writeln!(out, "  {}", self.roster.config().people.join(", "))?;
                return Ok(Flow::Continue);
            }
            Ok(Command::Lookup { person, date, week }) => (person, date, week),
            Err(message) => {
                writeln!(out, "{}", message.red())?;
                return Ok(Flow::Continue);
            }
        };

        self.reload();

        let requested = person.as_deref().unwrap_or(self.person.as_str());
        match select_person(&self.roster, Some(requested)) {
            Ok(selected) => self.person = selected,
            Err(e) => {
                writeln!(out, "{}", e.to_string().red())?;
                return Ok(Flow::Continue);
            }
        }

        let date = select_date(&self.roster, date)?;
        let report = Report::build(&self.roster, &self.person, date, week, &self.source);
        formatter::write_report(out, &report, self.format)?;
        Ok(Flow::Continue)
    }
}

/// Run the prompt loop until `quit` or end of input
pub fn run<R: BufRead, W: Write>(input: R, out: &mut W, mut session: Session<'_>) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!("Loaded '{}'. Type 'help' for commands.", session.source).bold()
    )?;

    let mut lines = input.lines();
    loop {
        write!(out, "{} ", session.prompt())?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        if session.handle_line(&line?, out)? == Flow::Quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write as _};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn lookup(person: Option<&str>, date: Option<NaiveDate>, week: bool) -> Command {
        Command::Lookup {
            person: person.map(String::from),
            date,
            week,
        }
    }

    fn people(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    // Single-sheet XLSX with inline-string cells
    fn roster_xlsx(rows: &[&[&str]]) -> Vec<u8> {
        let mut sheet = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (r, row) in rows.iter().enumerate() {
            sheet.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, text) in row.iter().enumerate().filter(|(_, t)| !t.is_empty()) {
                sheet.push_str(&format!(
                    r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    (b'A' + c as u8) as char,
                    r + 1,
                    text
                ));
            }
            sheet.push_str("</row>");
        }
        sheet.push_str("</sheetData></worksheet>");

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#
                    .to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
                    .to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Roster" sheetId="1" r:id="rId1"/></sheets></workbook>"#
                    .to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#
                    .to_string(),
            ),
            ("xl/worksheets/sheet1.xml", sheet),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_command() {
        let known = people(&["VB", "SRB"]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 4);

        assert_eq!(parse_command("quit", &known), Ok(Command::Quit));
        assert_eq!(parse_command("EXIT", &known), Ok(Command::Quit));
        assert_eq!(parse_command("people", &known), Ok(Command::People));
        assert_eq!(parse_command("?", &known), Ok(Command::Help));
        assert_eq!(parse_command("", &known), Ok(lookup(None, None, false)));
        assert_eq!(
            parse_command("VB", &known),
            Ok(lookup(Some("VB"), None, false))
        );
        assert_eq!(
            parse_command("VB 2024-03-04", &known),
            Ok(lookup(Some("VB"), date, false))
        );
        assert_eq!(
            parse_command("2024-03-04", &known),
            Ok(lookup(None, date, false))
        );
        assert_eq!(parse_command("week", &known), Ok(lookup(None, None, true)));
        assert_eq!(
            parse_command("week SRB 2024-03-04", &known),
            Ok(lookup(Some("SRB"), date, true))
        );
        assert!(parse_command("VB RR", &known).is_err());
        assert!(parse_command("VB 2024-03-04 extra", &known).is_err());
    }

    #[test]
    fn test_person_codes_win_over_keywords() {
        let known = people(&["Q", "VB"]);
        assert_eq!(parse_command("Q", &known), Ok(lookup(Some("Q"), None, false)));
        assert_eq!(parse_command("q", &known), Ok(Command::Quit));
        assert_eq!(parse_command("quit", &known), Ok(Command::Quit));
    }

    #[test]
    fn test_lookup_sees_edits_between_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        std::fs::write(
            &path,
            roster_xlsx(&[&["DATE", "1st", "2nd"], &["2024-03-04", "VB", "ST"]]),
        )
        .unwrap();

        let mut cache = ScheduleCache::new();
        let mut session = Session::open(
            &path,
            RosterConfig::default(),
            &mut cache,
            None,
            OutputFormat::Json,
        )
        .unwrap();

        let mut before = Vec::new();
        session.handle_line("2024-03-04", &mut before).unwrap();
        let before = String::from_utf8(before).unwrap();
        assert!(before.contains("1st Shift"), "{}", before);

        std::fs::write(
            &path,
            roster_xlsx(&[&["DATE", "1st", "2nd"], &["2024-03-04", "ST", "VB"]]),
        )
        .unwrap();

        let mut after = Vec::new();
        session.handle_line("2024-03-04", &mut after).unwrap();
        let after = String::from_utf8(after).unwrap();
        assert!(after.contains("2nd Shift"), "{}", after);
        assert!(!after.contains("1st Shift"), "{}", after);

        // Open and the first lookup share one parse; the edit forces another
        assert_eq!(cache.stats(), (1, 2));
    }

    #[test]
    fn test_run_scripted_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("march.xlsx");
        std::fs::write(
            &path,
            roster_xlsx(&[&["DATE/SHIFT", "1st", "Off"], &["2024-03-04", "ST/VB", "RR"]]),
        )
        .unwrap();

        let mut cache = ScheduleCache::new();
        let session = Session::open(
            &path,
            RosterConfig::default(),
            &mut cache,
            Some("RR"),
            OutputFormat::Json,
        )
        .unwrap();

        let input = Cursor::new("people\nZZ\nVB 2024-03-04\nquit\nRR 2024-03-04\n");
        let mut out = Vec::new();
        run(input, &mut out, session).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Loaded 'march.xlsx'"), "{}", out);
        assert!(out.contains("VB, RR, ST, SRB, AH"), "{}", out);
        assert!(out.contains("Unknown person 'ZZ'"), "{}", out);
        assert!(out.contains("\"person\": \"VB\""), "{}", out);
        assert!(out.contains("1st Shift"), "{}", out);
        // Nothing after quit is handled
        assert!(!out.contains("\"person\": \"RR\""), "{}", out);
    }
}
