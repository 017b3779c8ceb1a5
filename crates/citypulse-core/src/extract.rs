//! Field extraction from one parsed NDJSON line.
//!
//! Every extractor reads exactly one field and fails on its own with a
//! [`MalformedField`]. Strings are borrowed from the parsed line, so a
//! [`Record`] lives no longer than the [`Value`] it was read from.

use serde_json::Value;

use crate::error::MalformedField;

const AGE: &str = "age";
const NAME: &str = "name";
const CITY: &str = "city";
const FRIENDS: &str = "friends";
const FRIEND: &str = "friends[]";
const FRIEND_NAME: &str = "friends[].name";
const FRIEND_HOBBIES: &str = "friends[].hobbies";
const HOBBY: &str = "friends[].hobbies[]";

/// One friend entry of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friend<'a> {
    pub name: &'a str,
    pub hobbies: Vec<&'a str>,
}

/// The parts of a record's friend list that feed the aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Friends<'a> {
    /// Number of entries in the `friends` array.
    pub count: u64,
    /// Hobbies of all friends, flattened in input order.
    pub hobbies: Vec<&'a str>,
}

/// A fully extracted input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub age: u64,
    pub name: &'a str,
    pub city: &'a str,
    pub friends: Friends<'a>,
}

impl<'a> Record<'a> {
    /// Runs every extractor. The first failing field rejects the whole record.
    pub fn extract(json: &'a Value) -> Result<Self, MalformedField> {
        Ok(Self {
            age: extract_age(json)?,
            name: extract_name(json)?,
            city: extract_city(json)?,
            friends: extract_friends(json)?,
        })
    }
}

/// Reads `age` as a JSON unsigned integer or a string of ASCII digits.
pub fn extract_age(json: &Value) -> Result<u64, MalformedField> {
    match field(json, AGE, AGE)? {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| MalformedField::not_unsigned(AGE, number.to_string())),
        Value::String(text) => {
            parse_unsigned(text).ok_or_else(|| MalformedField::not_unsigned(AGE, text.as_str()))
        }
        _ => Err(MalformedField::wrong_type(AGE, "number or numeric string")),
    }
}

pub fn extract_name(json: &Value) -> Result<&str, MalformedField> {
    string_field(json, NAME, NAME)
}

pub fn extract_city(json: &Value) -> Result<&str, MalformedField> {
    string_field(json, CITY, CITY)
}

/// Reads the `friends` array.
///
/// Each entry must be an object with a string `name` and an array of string
/// `hobbies`. A friend without `hobbies` rejects the record instead of
/// counting as a friend with no hobbies.
pub fn extract_friends(json: &Value) -> Result<Friends<'_>, MalformedField> {
    let entries = field(json, FRIENDS, FRIENDS)?
        .as_array()
        .ok_or(MalformedField::wrong_type(FRIENDS, "array"))?;

    let mut hobbies = Vec::new();
    for entry in entries {
        hobbies.extend(extract_friend(entry)?.hobbies);
    }

    Ok(Friends {
        count: entries.len() as u64,
        hobbies,
    })
}

fn extract_friend(entry: &Value) -> Result<Friend<'_>, MalformedField> {
    if !entry.is_object() {
        return Err(MalformedField::wrong_type(FRIEND, "object"));
    }

    let name = string_field(entry, NAME, FRIEND_NAME)?;
    let hobbies = field(entry, "hobbies", FRIEND_HOBBIES)?
        .as_array()
        .ok_or(MalformedField::wrong_type(FRIEND_HOBBIES, "array"))?
        .iter()
        .map(|hobby| {
            hobby
                .as_str()
                .ok_or(MalformedField::wrong_type(HOBBY, "string"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Friend { name, hobbies })
}

fn field<'a>(json: &'a Value, key: &str, label: &'static str) -> Result<&'a Value, MalformedField> {
    json.get(key).ok_or(MalformedField::missing(label))
}

fn string_field<'a>(
    json: &'a Value,
    key: &str,
    label: &'static str,
) -> Result<&'a str, MalformedField> {
    field(json, key, label)?
        .as_str()
        .ok_or(MalformedField::wrong_type(label, "string"))
}

fn parse_unsigned(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
