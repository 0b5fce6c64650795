/// 32-bit string hash over UTF-16 code units: `h = c + (h << 5) - h`.
/// Not for anything but picking colors.
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0i32, |hash, unit| {
        (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

pub fn avatar_hue(name: &str) -> u32 {
    name_hash(name).unsigned_abs() % 360
}

pub fn avatar_color(name: &str) -> String {
    format!("hsl({}, 70%, 60%)", avatar_hue(name))
}

pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();

    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}
