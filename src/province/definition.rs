// src/province/definition.rs
//! Чтение и запись `definition.csv`
//!
//! Формат: строки через `;`, без заголовка, 8 полей. Порядок строк и все поля,
//! кроме рельефа, сохраняются при записи как есть.
//!
//! ## Побайтное сохранение строк
//!
//! При чтении рядом с каждой записью хранится её исходный текст вместе с
//! переводом строки (`\n` или `\r\n`) и пустыми строками вокруг. При записи:
//! - рельеф не менялся — исходный текст выводится без изменений;
//! - рельеф изменился — в исходном тексте заменяется только 7-е поле;
//! - исходного текста нет (или строка не делится на 8 полей по `;`) —
//!   строка сериализуется заново через `csv`.
//!
//! Поэтому регистр `TRUE`/`false`, окончания строк и прочие особенности
//! исходного файла переживают обработку.
//!
//! Запись идёт во временный файл рядом с целевым с последующим
//! переименованием: повторная запись безопасна, а прерванная не оставляет
//! полуготовый файл.

use crate::error::Result;
use crate::province::ProvinceDefinition;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const SEPARATOR: &str = ";";
const DELIMITER: u8 = SEPARATOR.as_bytes()[0];
const FIELD_COUNT: usize = 8;
const TERRAIN_FIELD: usize = 6;

/// Разбирает таблицу из произвольного источника
pub fn parse_definitions<R: Read>(mut reader: R) -> Result<Vec<ProvinceDefinition>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut rows: Vec<(usize, StringRecord)> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let start = record.position().map_or(0, |p| p.byte() as usize);
        rows.push((start, record));
    }

    // Срезы исходного текста покрывают весь файл: первая строка забирает всё
    // до себя, каждая следующая начинается там, где кончилась предыдущая.
    let mut definitions = Vec::with_capacity(rows.len());
    for (i, (position, record)) in rows.iter().enumerate() {
        let start = if i == 0 { 0 } else { *position };
        let end = rows.get(i + 1).map_or(text.len(), |(next, _)| *next);
        let mut definition: ProvinceDefinition = record.deserialize(None)?;
        definition.source = text.get(start..end).map(str::to_string);
        definitions.push(definition);
    }
    Ok(definitions)
}

/// Читает `definition.csv` с диска
pub fn read_definitions(path: &Path) -> Result<Vec<ProvinceDefinition>> {
    let definitions = parse_definitions(File::open(path)?)?;
    debug!(
        "Прочитано {} провинций из {}",
        definitions.len(),
        path.display()
    );
    Ok(definitions)
}

/// Пишет таблицу в том же формате, что и входная
pub fn write_definitions<'a, W, I>(mut writer: W, definitions: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ProvinceDefinition>,
{
    for definition in definitions {
        match definition.source.as_deref().and_then(|s| patch_source(s, definition)) {
            Some(row) => writer.write_all(row.as_bytes())?,
            None => writer.write_all(&serialize_row(definition)?)?,
        }
    }
    writer.flush()?;
    Ok(())
}

/// Исходный текст строки с актуальным рельефом; `None`, если поля не разбираются
fn patch_source(source: &str, definition: &ProvinceDefinition) -> Option<String> {
    let body_start = source.find(|c: char| c != '\r' && c != '\n')?;
    let body_len = source[body_start..]
        .find(['\r', '\n'])
        .unwrap_or(source.len() - body_start);
    let (leading, rest) = source.split_at(body_start);
    let (body, trailing) = rest.split_at(body_len);

    let mut fields: Vec<&str> = body.split(SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return None;
    }
    if fields[TERRAIN_FIELD] == definition.terrain {
        return Some(source.to_string());
    }
    fields[TERRAIN_FIELD] = &definition.terrain;
    Some(format!("{leading}{}{trailing}", fields.join(SEPARATOR)))
}

fn serialize_row(definition: &ProvinceDefinition) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(Vec::new());
    writer.serialize(definition)?;
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Сохраняет таблицу по пути `path`, перезаписывая существующий файл
pub fn save_definitions<'a, I>(path: &Path, definitions: I) -> Result<()>
where
    I: IntoIterator<Item = &'a ProvinceDefinition>,
{
    let tmp = temporary_path(path);
    {
        let file = File::create(&tmp)?;
        let mut out = BufWriter::new(file);
        write_definitions(&mut out, definitions)?;
        out.flush()?;
    }
    fs::rename(&tmp, path)?;
    debug!("Таблица сохранена в {}", path.display());
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::province::ProvinceType;

    const TABLE: &str = "\
0;0;0;0;land;false;unknown;0
7;5;6;7;sea;false;ocean;0
12;10;20;30;land;false;plains;1
13;11;22;33;lake;FALSE;lakes;0
14;12;24;36;land;True;forest;2
";

    fn round_trip(input: &str) -> String {
        let defs = parse_definitions(input.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_definitions(&mut out, &defs).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_all_fields() {
        let defs = parse_definitions(TABLE.as_bytes()).unwrap();
        assert_eq!(defs.len(), 5);

        let d = &defs[2];
        assert_eq!(d.id, 12);
        assert_eq!((d.r, d.g, d.b), (10, 20, 30));
        assert_eq!(d.province_type, ProvinceType::Land);
        assert!(!d.coastal);
        assert_eq!(d.terrain, "plains");
        assert_eq!(d.continent, "1");
        assert!(d.source.as_deref().unwrap().contains("12;10;20;30;land;false;plains;1"));

        assert!(defs[1].is_water());
        assert!(defs[3].is_water());
        assert!(!defs[3].coastal);
        assert!(defs[4].coastal);
    }

    #[test]
    fn unchanged_rows_are_written_byte_for_byte() {
        for input in [
            TABLE,
            "7;5;6;7;sea;false;ocean;0\n12;10;20;30;land;true;plains;1\n",
            "7;5;6;7;sea;false;ocean;0\r\n12;10;20;30;land;TRUE;plains;1\r\n",
            "7;5;6;7;sea;FALSE;ocean;0\n",
            "7;5;6;7;sea;False;ocean;0\r\n\r\n12;10;20;30;land;false;plains;1",
            "\n7;5;6;7;sea;false;ocean;0\n\n",
        ] {
            assert_eq!(round_trip(input), input);
        }
    }

    #[test]
    fn changed_row_keeps_everything_but_terrain() {
        let input = "7;5;6;7;sea;FALSE;ocean;0\r\n12;10;20;30;land;FALSE;plains;1\r\n";
        let mut defs = parse_definitions(input.as_bytes()).unwrap();
        defs[1].terrain = "forest".to_string();

        let mut out = Vec::new();
        write_definitions(&mut out, &defs).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "7;5;6;7;sea;FALSE;ocean;0\r\n12;10;20;30;land;FALSE;forest;1\r\n"
        );
    }

    #[test]
    fn rows_without_source_are_serialized() {
        let input = "12;10;20;30;land;TRUE;plains;1\r\n";
        let mut defs = parse_definitions(input.as_bytes()).unwrap();
        defs[0].source = None;
        defs[0].terrain = "hills".to_string();

        let mut out = Vec::new();
        write_definitions(&mut out, &defs).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "12;10;20;30;land;true;hills;1\n"
        );
    }

    #[test]
    fn bad_type_is_an_error() {
        assert!(parse_definitions("1;1;1;1;swamp;false;plains;1\n".as_bytes()).is_err());
        assert!(parse_definitions("1;1;1;1;land;maybe;plains;1\n".as_bytes()).is_err());
        assert!(parse_definitions("1;300;1;1;land;false;plains;1\n".as_bytes()).is_err());
    }

    #[test]
    fn save_overwrites_and_leaves_no_temporary() {
        let dir = std::env::temp_dir()
            .join(format!("terrain-reconcile-def-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("output.csv");

        let defs = parse_definitions(TABLE.as_bytes()).unwrap();
        save_definitions(&path, &defs).unwrap();
        save_definitions(&path, &defs[..2]).unwrap();

        let reread = read_definitions(&path).unwrap();
        assert_eq!(reread, defs[..2].to_vec());
        assert!(!temporary_path(&path).exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
