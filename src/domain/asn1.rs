//! Thin helpers for walking DER at the TLV level.
//!
//! The parsers in this crate classify elements by tag and position instead
//! of decoding into full ASN.1 structs, so they share these primitives.
//! Helpers return `der::Result`; callers map failures onto their own error
//! kind (format error, attribute parse error, malformed extension).

use der::asn1::{AnyRef, ObjectIdentifier};
use der::{Class, Decode, Reader, SliceReader, Tag, Tagged};

/// Decode exactly one TLV spanning all of `bytes`.
pub(crate) fn decode_tlv(bytes: &[u8]) -> der::Result<AnyRef<'_>> {
    AnyRef::from_der(bytes)
}

/// Decode all TLVs packed in `content`, in encoding order.
pub(crate) fn children(content: &[u8]) -> der::Result<Vec<AnyRef<'_>>> {
    let mut reader = SliceReader::new(content)?;
    let mut elements = Vec::new();
    while !reader.is_finished() {
        elements.push(AnyRef::decode(&mut reader)?);
    }
    Ok(elements)
}

/// Children of `element`, which must carry `expected` as its tag.
pub(crate) fn children_of<'a>(
    element: AnyRef<'a>,
    expected: Tag,
    what: &str,
) -> Result<Vec<AnyRef<'a>>, String> {
    expect_tag(element, expected, what)?;
    children(element.value()).map_err(|e| format!("{what}: {e}"))
}

/// Fail unless `element` has tag `expected`.
pub(crate) fn expect_tag(element: AnyRef<'_>, expected: Tag, what: &str) -> Result<(), String> {
    if element.tag() == expected {
        Ok(())
    } else {
        Err(format!("{what}: expected {expected}, found {}", element.tag()))
    }
}

/// Context-specific tag number, if `tag` is context-specific.
pub(crate) fn context_number(tag: Tag) -> Option<u8> {
    (tag.class() == Class::ContextSpecific).then(|| tag.number().value())
}

/// True for a constructed `[number]` context-specific tag.
pub(crate) fn is_constructed_context(tag: Tag, number: u8) -> bool {
    context_number(tag) == Some(number) && tag.is_constructed()
}

/// Decode an OBJECT IDENTIFIER element.
pub(crate) fn read_oid(element: AnyRef<'_>, what: &str) -> Result<ObjectIdentifier, String> {
    expect_tag(element, Tag::ObjectIdentifier, what)?;
    ObjectIdentifier::from_bytes(element.value()).map_err(|e| format!("{what}: {e}"))
}
