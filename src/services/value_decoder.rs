//! Display-string decoding for ASN.1 attribute values.
//!
//! Attribute values in Subject DNs and SubjectDirectoryAttributes come in a
//! handful of string and time encodings. The decoder never fails: values it
//! cannot render faithfully fall back to `#` followed by the hex DER
//! encoding, the same notation used for unknown DN values in RFC 4514.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use der::asn1::{AnyRef, UtcTime};
use der::{Decode, Encode, Tag, Tagged};

pub struct MultiTypeValueDecoder;

impl MultiTypeValueDecoder {
    /// Render a value given its universal tag and raw content octets.
    #[must_use]
    pub fn decode(tag: Tag, raw_value: &[u8]) -> String {
        let rendered = match tag {
            Tag::Utf8String | Tag::PrintableString | Tag::Ia5String => {
                std::str::from_utf8(raw_value).ok().map(str::to_string)
            }
            Tag::GeneralizedTime => Self::generalized_time_date(raw_value),
            Tag::UtcTime => Self::utc_time_date(raw_value),
            Tag::BmpString => Self::bmp_string(raw_value),
            Tag::VisibleString | Tag::NumericString | Tag::TeletexString => {
                Some(String::from_utf8_lossy(raw_value).into_owned())
            }
            _ => None,
        };
        rendered.unwrap_or_else(|| Self::generic(tag, raw_value))
    }

    /// Render a decoded TLV element.
    #[must_use]
    pub fn decode_any(value: AnyRef<'_>) -> String {
        Self::decode(value.tag(), value.value())
    }

    fn generalized_time_date(raw: &[u8]) -> Option<String> {
        let text = std::str::from_utf8(raw).ok()?;
        match Self::generalized_time_utc(text) {
            Some(utc) => Some(utc.date().format("%Y-%m-%d").to_string()),
            None => {
                log::debug!("GeneralizedTime '{text}' not parseable as a time, using date prefix");
                Self::date_prefix(raw)
            }
        }
    }

    /// `YYYYMMDDHH[MM[SS]][.f]` followed by `Z`, `+hhmm`, `-hhmm` or nothing.
    /// A time without zone designator is taken as is.
    fn generalized_time_utc(text: &str) -> Option<NaiveDateTime> {
        let (body, offset_seconds) = if let Some(body) = text.strip_suffix('Z') {
            (body, 0)
        } else if text.len() > 5 && matches!(text.as_bytes()[text.len() - 5], b'+' | b'-') {
            let (body, zone) = text.split_at(text.len() - 5);
            (body, Self::zone_offset_seconds(zone)?)
        } else {
            (text, 0)
        };

        let whole = body.split(['.', ',']).next()?;
        if whole.len() < 10 || whole.len() % 2 != 0 || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let field = |range: std::ops::Range<usize>| -> Option<u32> {
            whole.get(range).map_or(Some(0), |digits| digits.parse().ok())
        };
        let date = NaiveDate::from_ymd_opt(whole[..4].parse().ok()?, field(4..6)?, field(6..8)?)?;
        let local = date.and_hms_opt(field(8..10)?, field(10..12)?, field(12..14)?)?;
        let zone = FixedOffset::east_opt(offset_seconds)?;
        Some(zone.from_local_datetime(&local).single()?.naive_utc())
    }

    fn zone_offset_seconds(zone: &str) -> Option<i32> {
        let sign = if zone.starts_with('-') { -1 } else { 1 };
        let digits = &zone[1..];
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hours: i32 = digits[..2].parse().ok()?;
        let minutes: i32 = digits[2..].parse().ok()?;
        (hours < 24 && minutes < 60).then_some(sign * (hours * 3600 + minutes * 60))
    }

    fn utc_time_date(raw: &[u8]) -> Option<String> {
        let tlv = AnyRef::new(Tag::UtcTime, raw).ok()?.to_der().ok()?;
        let dt = UtcTime::from_der(&tlv).ok()?.to_date_time();
        Some(format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day()))
    }

    fn date_prefix(raw: &[u8]) -> Option<String> {
        let digits = raw.get(..8)?;
        if !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let text = std::str::from_utf8(digits).ok()?;
        let (month, day) = (&text[4..6], &text[6..8]);
        let valid_month = matches!(month.parse::<u8>(), Ok(1..=12));
        let valid_day = matches!(day.parse::<u8>(), Ok(1..=31));
        (valid_month && valid_day).then(|| format!("{}-{month}-{day}", &text[..4]))
    }

    fn bmp_string(raw: &[u8]) -> Option<String> {
        if raw.len() % 2 != 0 {
            return None;
        }
        let units = raw.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
        char::decode_utf16(units).collect::<Result<String, _>>().ok()
    }

    fn generic(tag: Tag, raw: &[u8]) -> String {
        let encoded = AnyRef::new(tag, raw).and_then(|any| any.to_der());
        match encoded {
            Ok(der) => format!("#{}", hex::encode(der)),
            Err(_) => format!("#{}", hex::encode(raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_string_types() {
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::Utf8String, "Nisse Hult".as_bytes()),
            "Nisse Hult"
        );
        assert_eq!(MultiTypeValueDecoder::decode(Tag::PrintableString, b"SE"), "SE");
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::Ia5String, b"user@example.com"),
            "user@example.com"
        );
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::Utf8String, "Åsa Öberg".as_bytes()),
            "Åsa Öberg"
        );
    }

    #[test]
    fn renders_generalized_time_as_iso_date() {
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::GeneralizedTime, b"19621102120000Z"),
            "1962-11-02"
        );
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::GeneralizedTime, b"19621102000000.5Z"),
            "1962-11-02"
        );
    }

    #[test]
    fn generalized_time_with_offset_is_shifted_to_utc() {
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::GeneralizedTime, b"20201231230000-0500"),
            "2021-01-01"
        );
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::GeneralizedTime, b"19620101003000+0100"),
            "1961-12-31"
        );
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::GeneralizedTime, b"2020123123-0500"),
            "2021-01-01"
        );
        // no zone designator: local time, date kept
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::GeneralizedTime, b"20201231230000"),
            "2020-12-31"
        );
    }

    #[test]
    fn renders_utc_time_as_iso_date() {
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::UtcTime, b"250101120000Z"),
            "2025-01-01"
        );
    }

    #[test]
    fn decodes_bmp_string() {
        let raw = [0x00, 0x53, 0x00, 0x45];
        assert_eq!(MultiTypeValueDecoder::decode(Tag::BmpString, &raw), "SE");
    }

    #[test]
    fn unknown_tags_fall_back_to_hex() {
        assert_eq!(MultiTypeValueDecoder::decode(Tag::Integer, &[0x05]), "#020105");
        assert_eq!(
            MultiTypeValueDecoder::decode(Tag::GeneralizedTime, b"garbage"),
            format!("#18{:02x}{}", 7, hex::encode(b"garbage"))
        );
    }

    #[test]
    fn invalid_utf8_falls_back_instead_of_failing() {
        let rendered = MultiTypeValueDecoder::decode(Tag::Utf8String, &[0xff, 0xfe]);
        assert_eq!(rendered, "#0c02fffe");
    }
}
