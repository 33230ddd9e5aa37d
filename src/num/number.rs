use smallvec::SmallVec;

use crate::{Error, Result};

pub type Numbers = SmallVec<[f32; 16]>;

pub fn format_integer(value: i32) -> String {
    let mut buffer = itoa::Buffer::new();
    buffer.format(value).to_string()
}

pub fn format_float(value: f32) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let mut buffer = ryu::Buffer::new();
    let raw = buffer.format_finite(value);
    if raw.contains(['e', 'E']) {
        return expand_exponent(raw);
    }
    trim_number(raw.to_string())
}

fn expand_exponent(raw: &str) -> String {
    let (mantissa, exponent) = match raw.split_once(['e', 'E']) {
        Some(parts) => parts,
        None => return trim_number(raw.to_string()),
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let dot = mantissa.find('.').unwrap_or(mantissa.len());
    let digits: String = mantissa.chars().filter(|ch| *ch != '.').collect();
    let point = dot as i32 + exponent;

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }
    if point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-point) as usize));
        out.push_str(&digits);
    } else if point as usize >= digits.len() {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', point as usize - digits.len()));
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        out.push_str(whole);
        out.push('.');
        out.push_str(fraction);
    }
    trim_number(out)
}

fn trim_number(mut value: String) -> String {
    if value.contains('.') {
        let kept = value.trim_end_matches('0').trim_end_matches('.').len();
        value.truncate(kept);
    }
    if value == "-0" {
        return "0".to_string();
    }
    value
}

pub fn parse_integer(text: &str) -> Result<i32> {
    let trimmed = text.trim();
    trimmed
        .parse::<i32>()
        .map_err(|_| Error::invalid_argument(format!("{trimmed:?} is not an integer")))
}

pub fn parse_float(text: &str) -> Result<f32> {
    let trimmed = text.trim();
    trimmed
        .parse::<f32>()
        .map_err(|_| Error::invalid_argument(format!("{trimmed:?} is not a float")))
}

fn word_end(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    i
}

/// `nan` and `inf`, the words [`format_float`] writes for non-finite values.
fn non_finite(word: &str) -> Option<f32> {
    match word {
        "nan" => Some(f32::NAN),
        "inf" => Some(f32::INFINITY),
        _ => None,
    }
}

/// Collects every number in `text`, skipping identifiers such as `vec4` or
/// `mat4x4` and any punctuation between numbers. `nan`, `inf` and `-inf`
/// count as numbers.
pub fn scan_numbers(text: &str) -> Result<Numbers> {
    let bytes = text.as_bytes();
    let mut out = Numbers::new();
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if byte.is_ascii_alphabetic() || byte == b'_' {
            let end = word_end(bytes, i);
            if let Some(value) = non_finite(&text[i..end]) {
                out.push(value);
            }
            i = end;
            continue;
        }
        if matches!(byte, b'-' | b'+') && bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic) {
            let end = word_end(bytes, i + 1);
            let token = &text[i..end];
            let value = non_finite(&text[i + 1..end]).ok_or_else(|| {
                Error::invalid_argument(format!("bad number {token:?} in {text:?}"))
            })?;
            out.push(if byte == b'-' { -value } else { value });
            i = end;
            continue;
        }
        if !(byte.is_ascii_digit() || matches!(byte, b'-' | b'+' | b'.')) {
            i += 1;
            continue;
        }
        let start = i;
        i += 1;
        while i < bytes.len() {
            match bytes[i] {
                b'0'..=b'9' | b'.' => i += 1,
                b'e' | b'E' => {
                    i += 1;
                    if i < bytes.len() && matches!(bytes[i], b'-' | b'+') {
                        i += 1;
                    }
                }
                _ => break,
            }
        }
        let token = &text[start..i];
        let value = token
            .parse::<f32>()
            .map_err(|_| Error::invalid_argument(format!("bad number {token:?} in {text:?}")))?;
        out.push(value);
    }
    Ok(out)
}
