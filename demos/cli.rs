use std::error;
use bibtex_names::{BibEntry, Parser};

use clap::Parser as CLIParser;

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Settings {
    /// Filepath to file to parse
    #[clap(short, long)]
    input: String,

    /// Return only entries with this ID
    #[clap(short, long)]
    query_id: Option<String>,

    /// Predefine a macro, e.g. `--macro acm=ACM`
    #[clap(short, long = "macro")]
    macros: Vec<String>,

    /// Print the parts of the author and editor names
    #[clap(long)]
    names: bool,

    /// Print the entries as JSON (needs the `serde_json` feature)
    #[clap(long)]
    json: bool,
}

fn read_entries(s: &Settings) -> Result<Vec<BibEntry>, Box<dyn error::Error>> {
    let mut p = Parser::with_month_macros();
    for definition in s.macros.iter() {
        match definition.split_once('=') {
            Some((name, value)) => p.define_macro(name.trim(), value),
            None => return Err(format!("macro definition '{}' lacks '='", definition).into()),
        }
    }
    let entries = p.parse_file(&s.input)?;
    Ok(entries
        .into_iter()
        .filter(|entry| s.query_id.as_ref().map_or(true, |query| query == &entry.id))
        .collect())
}

fn print_human_readable(s: &Settings, entries: &[BibEntry]) {
    for entry in entries {
        println!("type = {}", entry.kind);
        println!("id = {}", entry.id);
        for (name, data) in entry.fields.iter() {
            println!("\t{}\t= {}", name, data);
        }
        if s.names {
            for field in ["author", "editor"] {
                for person in entry.persons(field) {
                    println!(
                        "\t{}: forename = {:?}, von = {:?}, surname = {:?}, suffix = {:?}",
                        field, person.forename, person.von, person.surname, person.suffix
                    );
                }
            }
        }
    }
}

#[cfg(feature = "serde_json")]
fn print_json(entries: &[BibEntry]) -> Result<(), Box<dyn error::Error>> {
    println!("{}", serde_json::to_string(entries)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn error::Error>> {
    let settings = Settings::parse();
    let entries = read_entries(&settings)?;

    if settings.json {
        #[cfg(feature = "serde_json")]
        return print_json(&entries);
        #[cfg(not(feature = "serde_json"))]
        return Err("built without the serde_json feature".into());
    }
    print_human_readable(&settings, &entries);

    Ok(())
}
