//Bit positions inside a single register byte.
/*
 * bit[7]: MSB
 * ...
 * bit[0]: LSB
*/

/// Highest bit position in a register byte.
pub const MAX_BIT_POSITION: u8 = 7;

pub fn is_valid_position(pos: u8) -> bool {
    pos <= MAX_BIT_POSITION
}

/// Single bit mask for `pos`. `pos` must already be in [0,7].
pub fn mask(pos: u8) -> u8 {
    1 << pos
}

pub fn set(value: u8, pos: u8) -> u8 {
    value | mask(pos)
}

pub fn clear(value: u8, pos: u8) -> u8 {
    value & !mask(pos)
}

/// Sets `pos` when `bit` is 1, clears it when `bit` is 0.
pub fn write(value: u8, pos: u8, bit: u8) -> u8 {
    if bit == 0 {
        clear(value, pos)
    } else {
        set(value, pos)
    }
}

/// Moves bit `pos` of `value` into the LSB, returning 0 or 1.
pub fn extract(value: u8, pos: u8) -> u8 {
    (value & mask(pos)) >> pos
}
