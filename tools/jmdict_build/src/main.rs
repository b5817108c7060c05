use anyhow::{Context, Result};
use clap::Parser;
use libfurigana::jmdict::{write_index, JmdictEntry};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// Convert JMdict XML into the jmdict.fst + jmdict.bincode index.
#[derive(Parser)]
struct Args {
    /// JMdict or JMdict_e XML file
    #[arg(long)]
    input: PathBuf,

    #[arg(long, default_value = "data")]
    out: PathBuf,

    /// Glosses kept per entry, taken across senses in order
    #[arg(long, default_value_t = 10)]
    max_glosses: usize,
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Word,
    Reading,
    Gloss,
}

/// Stream-parse JMdict, keeping kanji forms, readings and the first
/// `max_glosses` English glosses of each entry, sense by sense.
fn parse_jmdict<R: BufRead>(input: R, max_glosses: usize) -> Result<Vec<JmdictEntry>> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut entries = Vec::new();
    let mut current = JmdictEntry::default();
    let mut field: Option<Field> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"entry" => current = JmdictEntry::default(),
                b"keb" => field = Some(Field::Word),
                b"reb" => field = Some(Field::Reading),
                b"gloss" => {
                    let english = e
                        .try_get_attribute("xml:lang")?
                        .map_or(true, |a| a.value.as_ref() == b"eng");
                    if english && current.glosses.len() < max_glosses {
                        field = Some(Field::Gloss);
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if let Some(f) = field {
                    let text = t.unescape()?.into_owned();
                    match f {
                        Field::Word => current.words.push(text),
                        Field::Reading => current.readings.push(text),
                        Field::Gloss => current.glosses.push(text),
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"keb" | b"reb" | b"gloss" => field = None,
                b"entry" => entries.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(entries)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file = File::open(&args.input).with_context(|| format!("opening {}", args.input.display()))?;
    let entries = parse_jmdict(BufReader::new(file), args.max_glosses)
        .with_context(|| format!("parsing {}", args.input.display()))?;
    write_index(&entries, &args.out)?;

    println!("Indexed {} entries into {}", entries.len(), args.out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE JMdict [
<!ENTITY n "noun (common) (futsuumeishi)">
]>
<JMdict>
<entry>
<ent_seq>1582710</ent_seq>
<k_ele><keb>日本</keb></k_ele>
<r_ele><reb>にほん</reb></r_ele>
<r_ele><reb>にっぽん</reb></r_ele>
<sense>
<pos>&n;</pos>
<gloss>Japan</gloss>
</sense>
<sense>
<gloss>Nippon</gloss>
</sense>
</entry>
<entry>
<ent_seq>1000000</ent_seq>
<r_ele><reb>ひらがな</reb></r_ele>
<sense>
<gloss>hiragana</gloss>
<gloss xml:lang="ger">Hiragana-Schrift</gloss>
<gloss>Japanese syllabary &amp; script</gloss>
</sense>
</entry>
</JMdict>"#;

    #[test]
    fn test_parse_sample() {
        let entries = parse_jmdict(SAMPLE.as_bytes(), 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].words, vec!["日本"]);
        assert_eq!(entries[0].readings, vec!["にほん", "にっぽん"]);
        assert_eq!(entries[0].glosses, vec!["Japan", "Nippon"]);
        assert!(entries[1].words.is_empty());
        assert_eq!(entries[1].glosses, vec!["hiragana", "Japanese syllabary & script"]);
    }

    #[test]
    fn test_gloss_limit_spans_senses() {
        let entries = parse_jmdict(SAMPLE.as_bytes(), 1).unwrap();
        assert_eq!(entries[0].glosses, vec!["Japan"]);
        assert_eq!(entries[1].glosses, vec!["hiragana"]);

        let entries = parse_jmdict(SAMPLE.as_bytes(), 2).unwrap();
        assert_eq!(entries[0].glosses, vec!["Japan", "Nippon"]);
    }
}
