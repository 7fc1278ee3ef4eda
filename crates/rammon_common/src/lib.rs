/// XOR of every byte in `data`; 0x00 for an empty buffer.
///
/// Transfer-integrity helper for host tooling that ships memory images
/// around. The monitor protocol itself does not checksum frames, so this
/// stays a free function rather than part of the wire format.
pub fn xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, byte| acc ^ byte)
}

/// Render `data` as space-separated uppercase hex pairs.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

/// Like [`hex_dump`], but truncated to `max` bytes with a trailing `..`
/// marker. Intended for log lines where a bulk payload would drown the
/// rest of the record.
pub fn hex_preview(data: &[u8], max: usize) -> String {
    if data.len() <= max {
        hex_dump(data)
    } else {
        format!("{} ..", hex_dump(&data[..max]))
    }
}
