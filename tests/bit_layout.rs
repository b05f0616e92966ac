use d2v_reader::{GopInfo, PictureCodingType, PictureFlags};

/// Binary digits of a byte, most significant first.
fn bits(byte: u8) -> Vec<char> {
    format!("{:08b}", byte).chars().collect()
}

#[test]
fn info_byte_matches_layout_for_all_values() {
    for byte in 0..=u8::MAX {
        let b = bits(byte);
        let info = GopInfo::from(byte);
        assert_eq!(
            info.data_line_signal,
            b[0].to_digit(2).unwrap() as u8,
            "data_line_signal for {:#04x}",
            byte
        );
        assert_eq!(info.part_of_closed_gop, b[1] == '1', "closed gop for {:#04x}", byte);
        assert_eq!(
            info.part_of_progressive_sequence,
            b[2] == '1',
            "progressive sequence for {:#04x}",
            byte
        );
        assert_eq!(
            info.first_picture_of_new_gop,
            b[3] == '1',
            "new gop for {:#04x}",
            byte
        );
        assert_eq!(
            info.reserved,
            b[4..].iter().collect::<String>(),
            "reserved for {:#04x}",
            byte
        );
    }
}

#[test]
fn flag_byte_matches_layout_for_all_values() {
    for byte in 0..=u8::MAX {
        let b = bits(byte);
        let flags = PictureFlags::from(byte);
        let expected_type = match (b[2], b[3]) {
            ('0', '0') => PictureCodingType::Reserved,
            ('0', '1') => PictureCodingType::I,
            ('1', '0') => PictureCodingType::P,
            _ => PictureCodingType::B,
        };
        assert_eq!(flags.require_previous_gop, b[0] == '0', "rpg for {:#04x}", byte);
        assert_eq!(flags.progressive_frame, b[1] == '1', "progressive for {:#04x}", byte);
        assert_eq!(flags.picture_coding_type, expected_type, "type for {:#04x}", byte);
        assert_eq!(
            flags.reserved_bits,
            b[4..6].iter().collect::<String>(),
            "reserved bits for {:#04x}",
            byte
        );
        assert_eq!(flags.tff, b[6] == '1', "tff for {:#04x}", byte);
        assert_eq!(flags.rff, b[7] == '1', "rff for {:#04x}", byte);
    }
}

#[test]
fn flag_byte_0x51() {
    assert_eq!(
        PictureFlags::from(0x51),
        PictureFlags {
            require_previous_gop: true,
            progressive_frame: true,
            picture_coding_type: PictureCodingType::I,
            reserved_bits: "00".to_string(),
            tff: false,
            rff: true,
        }
    );
}

#[test]
fn wide_info_values_count_bits_from_the_top() {
    // 0x900 = 1001 0000 0000
    let info = GopInfo::from_value(0x900);
    assert_eq!(info.data_line_signal, 1);
    assert!(!info.part_of_closed_gop);
    assert!(!info.part_of_progressive_sequence);
    assert!(info.first_picture_of_new_gop);
    assert_eq!(info.reserved, "00000000");

    // 0x100 = 1 0000 0000
    let info = GopInfo::from_value(0x100);
    assert_eq!(info.data_line_signal, 1);
    assert!(!info.first_picture_of_new_gop);
    assert_eq!(info.reserved, "00000");

    assert_eq!(GopInfo::from_value(0x7f), GopInfo::from(0x7f));
}

#[test]
fn coding_type_from_bits() {
    assert_eq!(PictureCodingType::from_bits(0b00), PictureCodingType::Reserved);
    assert_eq!(PictureCodingType::from_bits(0b01), PictureCodingType::I);
    assert_eq!(PictureCodingType::from_bits(0b10), PictureCodingType::P);
    assert_eq!(PictureCodingType::from_bits(0b11), PictureCodingType::B);
    // Only the low two bits count.
    assert_eq!(PictureCodingType::from_bits(0b101), PictureCodingType::I);
}
