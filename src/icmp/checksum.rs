/// Internet checksum (RFC 1071) over `bytes`.
///
/// Words are read big-endian. An odd trailing byte is the high byte of a
/// final word whose low byte is zero. Running it over a message whose
/// checksum field is already filled in yields `0x0000`.
pub fn checksum(bytes: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    let mut words = bytes.chunks_exact(2);
    for word in &mut words {
        sum += u32::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let [last] = words.remainder() {
        sum += u32::from(*last) << 8;
    }

    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }

    !(sum as u16)
}
