//! Minimal Chinese codepoint classification. This crate's dictionary and
//! deconjugation pipeline is Japanese-only; this stub exists because
//! [`crate::translator`] imports it alongside the Japanese equivalent to
//! decide which script a headword's characters belong to for tag purposes.

const CJK_UNIFIED_RANGE: (u32, u32) = (0x4e00, 0x9fff);
const CJK_EXT_A_RANGE: (u32, u32) = (0x3400, 0x4dbf);

pub fn is_code_point_chinese(code_point: u32) -> bool {
    (code_point >= CJK_UNIFIED_RANGE.0 && code_point <= CJK_UNIFIED_RANGE.1)
        || (code_point >= CJK_EXT_A_RANGE.0 && code_point <= CJK_EXT_A_RANGE.1)
}
