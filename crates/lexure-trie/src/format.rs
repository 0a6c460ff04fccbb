// Binary blob format: header layout, encode/decode, structural validation.
//
// Layout (all integers little-endian; the endian marker rejects blobs from
// foreign-endian builds instead of byte-swapping):
//
//   bytes  0..8   signature "TrieBlob"
//   bytes  8..12  endian marker 0x04030201
//   bytes 12..16  node table offset (bytes, 4-aligned)
//   bytes 16..20  node table length (u32 slots)
//   bytes 20..24  character table offset (bytes)
//   bytes 24..28  character table length (bytes)
//   bytes 28..40  trie info: strip prefix, compound marker, forbidden
//                 prefix (one code point each)
//
// The character table is the '\n'-joined symbol list (slot 0 is empty, so
// the section starts with a separator), padded to a 4-byte boundary; the
// node table follows.

use bytemuck::{Pod, Zeroable};

use lexure_core::TrieInfo;

use crate::TrieBlobError;
use crate::blob::{NODE_CHILD_REF_SHIFT, NODE_MASK_NUM_CHILDREN, TrieBlob};
use crate::char_index::CharIndexTable;

pub const HEADER_SIZE: usize = 40;

const SIGNATURE: [u8; 8] = *b"TrieBlob";
const ENDIAN_MARKER: u32 = 0x0403_0201;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct BlobHeader {
    sig: [u8; 8],
    endian: u32,
    nodes_offset: u32,
    nodes_len: u32,
    char_index_offset: u32,
    char_index_len: u32,
    info_strip: u32,
    info_compound: u32,
    info_forbidden: u32,
}

const _: () = assert!(size_of::<BlobHeader>() == HEADER_SIZE);

/// Serialize a blob. The output decodes to a value-identical blob; byte
/// stability across rebuilds of the same word list is not promised.
pub fn encode(blob: &TrieBlob) -> Vec<u8> {
    let char_bytes = blob.char_index.chars().join("\n").into_bytes();
    let char_len = char_bytes.len();
    let padded_char_len = (char_len + 3) & !3;
    let nodes_offset = HEADER_SIZE + padded_char_len;

    let header = BlobHeader {
        sig: SIGNATURE,
        endian: ENDIAN_MARKER,
        nodes_offset: nodes_offset as u32,
        nodes_len: blob.nodes.len() as u32,
        char_index_offset: HEADER_SIZE as u32,
        char_index_len: char_len as u32,
        info_strip: blob.info.strip_case_and_accents_prefix as u32,
        info_compound: blob.info.compound_character as u32,
        info_forbidden: blob.info.forbidden_word_prefix as u32,
    };

    let mut out = Vec::with_capacity(nodes_offset + blob.nodes.len() * 4);
    out.extend_from_slice(bytemuck::bytes_of(&header));
    out.extend_from_slice(&char_bytes);
    out.resize(nodes_offset, 0);
    out.extend_from_slice(bytemuck::cast_slice(&blob.nodes));
    out
}

/// Decode and fully validate a blob.
pub fn decode(data: &[u8]) -> Result<TrieBlob, TrieBlobError> {
    if data.len() < HEADER_SIZE {
        return Err(TrieBlobError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    let header: BlobHeader = bytemuck::pod_read_unaligned(&data[..HEADER_SIZE]);
    if header.sig != SIGNATURE {
        return Err(TrieBlobError::InvalidSignature);
    }
    if header.endian != ENDIAN_MARKER {
        return Err(TrieBlobError::EndianMismatch);
    }

    let char_index = decode_char_index(data, &header)?;
    let nodes = decode_nodes(data, &header)?;
    validate_nodes(&nodes)?;

    let info = TrieInfo {
        strip_case_and_accents_prefix: decode_info_char(header.info_strip)?,
        compound_character: decode_info_char(header.info_compound)?,
        forbidden_word_prefix: decode_info_char(header.info_forbidden)?,
    };

    Ok(TrieBlob::from_parts(nodes, char_index, info))
}

fn section<'d>(
    data: &'d [u8],
    name: &'static str,
    offset: usize,
    len: usize,
) -> Result<&'d [u8], TrieBlobError> {
    let end = offset.checked_add(len).ok_or(TrieBlobError::SectionOutOfBounds {
        section: name,
        offset,
        end: usize::MAX,
        len: data.len(),
    })?;
    if offset < HEADER_SIZE || end > data.len() {
        return Err(TrieBlobError::SectionOutOfBounds {
            section: name,
            offset,
            end,
            len: data.len(),
        });
    }
    Ok(&data[offset..end])
}

fn decode_char_index(data: &[u8], header: &BlobHeader) -> Result<CharIndexTable, TrieBlobError> {
    let bytes = section(
        data,
        "character table",
        header.char_index_offset as usize,
        header.char_index_len as usize,
    )?;
    let text = std::str::from_utf8(bytes)
        .map_err(|_| TrieBlobError::InvalidCharIndex("section is not valid UTF-8".to_string()))?;
    let chars: Vec<String> = text.split('\n').map(String::from).collect();
    CharIndexTable::from_chars(chars).map_err(TrieBlobError::InvalidCharIndex)
}

fn decode_nodes(data: &[u8], header: &BlobHeader) -> Result<Vec<u32>, TrieBlobError> {
    let offset = header.nodes_offset as usize;
    if offset % 4 != 0 {
        return Err(TrieBlobError::MisalignedNodeTable);
    }
    let byte_len = (header.nodes_len as usize)
        .checked_mul(4)
        .ok_or(TrieBlobError::SectionOutOfBounds {
            section: "node table",
            offset,
            end: usize::MAX,
            len: data.len(),
        })?;
    let bytes = section(data, "node table", offset, byte_len)?;
    let nodes = match bytemuck::try_cast_slice::<u8, u32>(bytes) {
        Ok(slice) => slice.to_vec(),
        // The blob buffer itself may be unaligned; fall back to a copy.
        Err(_) => bytes
            .chunks_exact(4)
            .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    };
    Ok(nodes)
}

fn decode_info_char(code: u32) -> Result<char, TrieBlobError> {
    char::from_u32(code).ok_or(TrieBlobError::InvalidInfoCodePoint(code))
}

/// Walk the node table once to collect node starts, then verify every child
/// reference lands on one. Corrupt references fail here, not at query time.
fn validate_nodes(nodes: &[u32]) -> Result<(), TrieBlobError> {
    if nodes.is_empty() {
        return Err(TrieBlobError::EmptyNodeTable);
    }

    let mut starts = hashbrown::HashSet::new();
    let mut offset = 0usize;
    while offset < nodes.len() {
        starts.insert(offset as u32);
        let count = (nodes[offset] & NODE_MASK_NUM_CHILDREN) as usize;
        offset += count + 1;
    }
    if offset != nodes.len() {
        return Err(TrieBlobError::NodeTableTruncated {
            expected: offset,
            actual: nodes.len(),
        });
    }

    offset = 0;
    while offset < nodes.len() {
        let count = (nodes[offset] & NODE_MASK_NUM_CHILDREN) as usize;
        for i in 1..=count {
            let reference = nodes[offset + i] >> NODE_CHILD_REF_SHIFT;
            if !starts.contains(&reference) {
                return Err(TrieBlobError::NodeRefInvalid {
                    node: offset as u32,
                    reference,
                });
            }
        }
        offset += count + 1;
    }
    Ok(())
}
