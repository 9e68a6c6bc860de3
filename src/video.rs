use crate::bus::{MemoryBus, VIDEO_END_ADDR, VIDEO_START_ADDR};

use std::fmt::Display;

/// Display code of the first graphics block. Every code from here up to [`GRAPHICS_CODE_MAX`]
/// encodes a 2 x 3 grid of binary pixels instead of a text glyph.
pub const GRAPHICS_CODE_BASE: u8 = 128;

/// Display code of the last graphics block.
pub const GRAPHICS_CODE_MAX: u8 = 191;

/// Number of distinct graphics block codes, one per 2 x 3 on/off combination.
const GRAPHICS_CODE_COUNT: usize = 64;

/// Display code written to every cell when the screen is cleared.
const BLANK_CODE: u8 = 0x20;

/// Number of character cells in each display row.
const SCREEN_COLUMNS: usize = 64;

/// Number of character rows on the display.
const SCREEN_ROWS: usize = 16;

/// Width of the block graphics canvas in pixels.
const CANVAS_WIDTH: usize = 128;

/// Height of the block graphics canvas in pixels.
const CANVAS_HEIGHT: usize = 48;

/// Number of sub pixel columns in a graphics block.
const BLOCK_COLUMNS: usize = 2;

/// Number of sub pixel rows in a graphics block.
const BLOCK_ROWS: usize = 3;

/// Width in pixels of a rendered character cell.
const CELL_WIDTH: usize = 8;

/// Number of scan lines in a rendered character cell.
const CELL_HEIGHT: usize = 12;

/// Number of scan lines each sub pixel of a graphics block covers in the rendered cell.
const BLOCK_LINE_HEIGHT: usize = CELL_HEIGHT / BLOCK_ROWS;

/// Display code of the first entry in the text font table.
const FONT_BASE_CODE: usize = 32;

/// Number of scan lines in a font face.
const FONT_HEIGHT: usize = 7;

/// Number of blank scan lines above a font face within the rendered cell.
const FONT_TOP_MARGIN: usize = 2;

/// Returns `true` if the given video window byte encodes a graphics block rather than a text
/// glyph. Codes 192 through 255 render as block glyphs due to the character generator wraparound
/// but are not graphics blocks for pixel purposes.
pub fn is_graphics_code(value: u8) -> bool {
    (GRAPHICS_CODE_BASE..=GRAPHICS_CODE_MAX).contains(&value)
}

/// Returns the bit position within a graphics block pattern of the sub pixel at the given column
/// and row. Row 0 occupies bits 5 and 4, row 1 bits 3 and 2, row 2 bits 1 and 0, with the left
/// column in the higher bit of each pair.
///
/// 543210 <- Bit position
/// ------
/// 000000
/// ||||||
/// |||||- row 2 right
/// ||||-- row 2 left
/// |||--- row 1 right
/// ||---- row 1 left
/// |----- row 0 right
/// ------ row 0 left
fn pattern_bit(sub_col: usize, sub_row: usize) -> u32 {
    (5 - (sub_row * BLOCK_COLUMNS + sub_col)) as u32
}

/// The [`Color`] struct defines a display color in the RGB format with values of each component
/// ranging from 0 to 255.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Color {
    // Red component.
    pub r: u8,
    // Green component.
    pub g: u8,
    // Blue component.
    pub b: u8,
}

impl Display for Color {
    /// Writes the [`Color`] to the formatter as a CSS-style hex string, e.g. `#00FF00`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A [`CharacterGlyph`] is the immutable 8 x 12 bitmap for one display code in the character
/// generator. Each row is stored as a byte with the most significant bit as the leftmost pixel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CharacterGlyph {
    /// Raw row data of the glyph, top scan line first.
    rows: [u8; CELL_HEIGHT],
}

impl CharacterGlyph {
    /// Creates a blank [`CharacterGlyph`] with no pixels lit.
    pub const fn blank() -> Self {
        Self {
            rows: [0; CELL_HEIGHT],
        }
    }
    /// Returns `true` if the pixel at the given position within the cell is lit. The `x` and `y`
    /// are zero-based.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        assert!(x < CELL_WIDTH);
        assert!(y < CELL_HEIGHT);

        (self.rows[y] >> (CELL_WIDTH - 1 - x)) & 1 != 0
    }
    /// Creates the glyph for a text code from its 5 x 7 font face. The face is offset one pixel
    /// from the left edge of the cell and two scan lines from the top.
    fn from_face(face: [u8; FONT_HEIGHT]) -> Self {
        let mut rows = [0; CELL_HEIGHT];
        for (i, bits) in face.iter().enumerate() {
            rows[i + FONT_TOP_MARGIN] = *bits << 2;
        }

        Self { rows }
    }
    /// Creates the glyph for a graphics block code from its 6 bit pattern. Each lit sub pixel
    /// fills a 4 x 4 region of the cell.
    fn block(pattern: u8) -> Self {
        let mut rows = [0; CELL_HEIGHT];
        for sub_row in 0..BLOCK_ROWS {
            for sub_col in 0..BLOCK_COLUMNS {
                if (pattern >> pattern_bit(sub_col, sub_row)) & 1 == 0 {
                    continue;
                }

                for line in 0..BLOCK_LINE_HEIGHT {
                    rows[sub_row * BLOCK_LINE_HEIGHT + line] |= 0xF0 >> (sub_col * 4);
                }
            }
        }

        Self { rows }
    }
}

/// Fixed 5 x 7 font faces for display codes 32 through 127, one byte per scan line with the
/// leftmost pixel in bit 4.
const FONT_FACES: [[u8; FONT_HEIGHT]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04], // !
    [0x0A, 0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00], // "
    [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A], // #
    [0x04, 0x0F, 0x14, 0x0E, 0x05, 0x1E, 0x04], // $
    [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03], // %
    [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D], // &
    [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00], // '
    [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02], // (
    [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08], // )
    [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00], // *
    [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08], // ,
    [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C], // .
    [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00], // /
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E], // 0
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E], // 1
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F], // 2
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E], // 3
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02], // 4
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E], // 5
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E], // 6
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08], // 7
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E], // 8
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C], // 9
    [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00], // :
    [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x04, 0x08], // ;
    [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02], // <
    [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00], // =
    [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08], // >
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04], // ?
    [0x0E, 0x11, 0x01, 0x0D, 0x15, 0x15, 0x0E], // @
    [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11], // A
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E], // B
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E], // C
    [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C], // D
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F], // E
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10], // F
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F], // G
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // H
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // I
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C], // J
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11], // K
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F], // L
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11], // M
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11], // N
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // O
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10], // P
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D], // Q
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11], // R
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E], // S
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04], // T
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // U
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04], // V
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A], // W
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11], // X
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04], // Y
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F], // Z
    [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E], // [
    [0x00, 0x10, 0x08, 0x04, 0x02, 0x01, 0x00], // backslash
    [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E], // ]
    [0x04, 0x0A, 0x11, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F], // _
    [0x08, 0x04, 0x02, 0x00, 0x00, 0x00, 0x00], // `
    [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F], // a
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E], // b
    [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E], // c
    [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F], // d
    [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E], // e
    [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08], // f
    [0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x0E], // g
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11], // h
    [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E], // i
    [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C], // j
    [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12], // k
    [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // l
    [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11], // m
    [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11], // n
    [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E], // o
    [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10], // p
    [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01], // q
    [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10], // r
    [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E], // s
    [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06], // t
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D], // u
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04], // v
    [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A], // w
    [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11], // x
    [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E], // y
    [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F], // z
    [0x02, 0x04, 0x04, 0x08, 0x04, 0x04, 0x02], // {
    [0x04, 0x04, 0x04, 0x00, 0x04, 0x04, 0x04], // |
    [0x08, 0x04, 0x04, 0x02, 0x04, 0x04, 0x08], // }
    [0x00, 0x00, 0x08, 0x15, 0x02, 0x00, 0x00], // ~
    [0x1F, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F], // del
];

/// Builds the full 256 entry character generator table. Codes 0 through 31 are blank, 32 through
/// 127 come from the font, 128 through 191 are the algorithmically generated graphics blocks and
/// 192 through 255 repeat the blocks due to the hardware address wraparound.
fn build_char_rom() -> [CharacterGlyph; 256] {
    let mut table = [CharacterGlyph::blank(); 256];

    for (i, face) in FONT_FACES.iter().enumerate() {
        table[FONT_BASE_CODE + i] = CharacterGlyph::from_face(*face);
    }

    for pattern in 0..GRAPHICS_CODE_COUNT {
        let glyph = CharacterGlyph::block(pattern as u8);
        table[GRAPHICS_CODE_BASE as usize + pattern] = glyph;
        table[GRAPHICS_CODE_BASE as usize + GRAPHICS_CODE_COUNT + pattern] = glyph;
    }

    table
}

/// The [`VideoEncoder`] interprets the video window of a [`MemoryBus`] as a 64 x 16 character
/// display and a 128 x 48 block graphics canvas. It never owns any storage of its own: every
/// operation takes the bus and reads or writes the shared video window bytes through it, so text
/// and pixel operations alias the same memory exactly as they do on the hardware.
#[derive(Debug)]
pub struct VideoEncoder {
    /// Number of character cells per display row.
    pub columns: u16,
    /// Number of character rows on the display.
    pub rows: u16,
    /// Width in pixels of a rendered character cell.
    pub char_width: u16,
    /// Height in pixels of a rendered character cell.
    pub char_height: u16,
    /// Width of the block graphics canvas in pixels.
    pub graphics_width: u16,
    /// Height of the block graphics canvas in pixels.
    pub graphics_height: u16,
    /// Address of the first byte of the video window.
    pub video_memory_start: u16,
    /// Address of the last byte of the video window.
    pub video_memory_end: u16,
    /// Indicates whether the display is considered to be in text mode. Tracked for callers but
    /// does not gate any operation; text and pixel operations always share the same bytes.
    pub text_mode: bool,
    /// Foreground phosphor color used when rendering.
    pub fg_color: Color,
    /// Background color used when rendering.
    pub bg_color: Color,
    /// Character generator table indexed by display code.
    char_rom: [CharacterGlyph; 256],
}

impl VideoEncoder {
    /// Creates a new default [`VideoEncoder`].
    pub fn new() -> Self {
        Self::default()
    }
    /// Gets a reference to the [`CharacterGlyph`] for the given display code.
    pub fn glyph(&self, code: u8) -> &CharacterGlyph {
        &self.char_rom[code as usize]
    }
    /// Turns on the pixel at the given canvas coordinate and returns `true`. If the coordinate
    /// lies outside the canvas nothing is written and `false` is returned. A cell currently
    /// holding a text glyph is replaced by a fresh graphics block containing only the new pixel;
    /// a cell already holding a graphics block has the pixel merged into its pattern.
    pub fn set_pixel(&self, x: i32, y: i32, bus: &mut MemoryBus) -> bool {
        if !self.in_canvas(x, y) {
            tracing::debug!("set pixel out of range: ({}, {})", x, y);
            return false;
        }

        let address = self.block_address(x, y);
        let current = bus.read_byte(address);

        let pattern = if is_graphics_code(current) {
            current - GRAPHICS_CODE_BASE
        } else {
            0
        };

        let bit = pattern_bit((x % 2) as usize, (y % 3) as usize);
        let updated = pattern | 1 << bit;

        tracing::debug!("set pixel ({}, {}) address: {:#06x} bit: {}", x, y, address, bit);

        bus.write_byte(address, GRAPHICS_CODE_BASE + updated);

        true
    }
    /// Turns off the pixel at the given canvas coordinate and returns `true`. If the coordinate
    /// lies outside the canvas, or the cell does not currently hold a graphics block, nothing is
    /// written and `false` is returned. The hardware has no way to clear a single pixel out of a
    /// text glyph.
    pub fn reset_pixel(&self, x: i32, y: i32, bus: &mut MemoryBus) -> bool {
        if !self.in_canvas(x, y) {
            tracing::debug!("reset pixel out of range: ({}, {})", x, y);
            return false;
        }

        let address = self.block_address(x, y);
        let current = bus.read_byte(address);

        if !is_graphics_code(current) {
            tracing::debug!("reset pixel on non-graphics cell: ({}, {})", x, y);
            return false;
        }

        let pattern = current - GRAPHICS_CODE_BASE;
        let bit = pattern_bit((x % 2) as usize, (y % 3) as usize);
        let updated = pattern & !(1 << bit);

        tracing::debug!("reset pixel ({}, {}) address: {:#06x} bit: {}", x, y, address, bit);

        bus.write_byte(address, GRAPHICS_CODE_BASE + updated);

        true
    }
    /// Queries the pixel at the given canvas coordinate, returning `-1` if it is on and `0` if it
    /// is off. Coordinates outside the canvas and cells that do not hold a graphics block report
    /// `0`. The -1/0 convention matches the BASIC POINT function and is preserved bit-exactly.
    pub fn point_pixel(&self, x: i32, y: i32, bus: &MemoryBus) -> i8 {
        if !self.in_canvas(x, y) {
            return 0;
        }

        let current = bus.read_byte(self.block_address(x, y));
        if !is_graphics_code(current) {
            return 0;
        }

        let pattern = current - GRAPHICS_CODE_BASE;
        let bit = pattern_bit((x % 2) as usize, (y % 3) as usize);

        if (pattern >> bit) & 1 != 0 { -1 } else { 0 }
    }
    /// Writes the ASCII bytes of the given text into consecutive cells starting at the given row
    /// and column. No wrapping or clamping is applied beyond the address arithmetic itself.
    pub fn write_string(&self, bus: &mut MemoryBus, text: &str, row: u16, col: u16) {
        tracing::debug!("write {} byte string at row {} col {}", text.len(), row, col);

        let start = self
            .video_memory_start
            .wrapping_add(row.wrapping_mul(self.columns))
            .wrapping_add(col);

        for (i, byte) in text.bytes().enumerate() {
            bus.write_byte(start.wrapping_add(i as u16), byte);
        }
    }
    /// Writes the blank character to every cell of the video window.
    pub fn clear_screen(&self, bus: &mut MemoryBus) {
        tracing::debug!("clear screen");

        for address in self.video_memory_start..=self.video_memory_end {
            bus.write_byte(address, BLANK_CODE);
        }
    }
    /// Returns the raw byte value of every cell in the video window as a row-major grid, one
    /// entry per text cell. No decoding is applied.
    pub fn screen_snapshot(&self, bus: &MemoryBus) -> [[u8; SCREEN_COLUMNS]; SCREEN_ROWS] {
        let mut cells = [[0; SCREEN_COLUMNS]; SCREEN_ROWS];

        for (row, row_cells) in cells.iter_mut().enumerate() {
            for (col, cell) in row_cells.iter_mut().enumerate() {
                let address = self
                    .video_memory_start
                    .wrapping_add((row * SCREEN_COLUMNS + col) as u16);

                *cell = bus.read_byte(address);
            }
        }

        cells
    }
    /// Returns the on/off state of every pixel on the canvas as a row-major grid of 1/0 values.
    /// Cells holding a graphics block decode their 6 bit pattern; every other cell contributes
    /// six zeros to the pixels it covers.
    pub fn graphics_snapshot(&self, bus: &MemoryBus) -> [[u8; CANVAS_WIDTH]; CANVAS_HEIGHT] {
        let mut pixels = [[0; CANVAS_WIDTH]; CANVAS_HEIGHT];

        for block_row in 0..SCREEN_ROWS {
            for block_col in 0..SCREEN_COLUMNS {
                let address = self
                    .video_memory_start
                    .wrapping_add((block_row * SCREEN_COLUMNS + block_col) as u16);

                let value = bus.read_byte(address);
                if !is_graphics_code(value) {
                    continue;
                }

                let pattern = value - GRAPHICS_CODE_BASE;
                for sub_row in 0..BLOCK_ROWS {
                    for sub_col in 0..BLOCK_COLUMNS {
                        if (pattern >> pattern_bit(sub_col, sub_row)) & 1 != 0 {
                            let y = block_row * BLOCK_ROWS + sub_row;
                            let x = block_col * BLOCK_COLUMNS + sub_col;
                            pixels[y][x] = 1;
                        }
                    }
                }
            }
        }

        pixels
    }
    /// Returns `true` if the given coordinate lies on the block graphics canvas.
    fn in_canvas(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < i32::from(self.graphics_width) && y >= 0 && y < i32::from(self.graphics_height)
    }
    /// Returns the video window address of the graphics block covering the given canvas
    /// coordinate. The coordinate must already be validated against the canvas bounds.
    fn block_address(&self, x: i32, y: i32) -> u16 {
        let block_col = (x as u16) / BLOCK_COLUMNS as u16;
        let block_row = (y as u16) / BLOCK_ROWS as u16;

        self.video_memory_start + block_row * self.columns + block_col
    }
}

impl Default for VideoEncoder {
    /// Creates a default [`VideoEncoder`] describing the stock display hardware: a 64 x 16 text
    /// screen over the video window at 0x3C00, a 128 x 48 block graphics canvas and a green on
    /// black phosphor palette.
    fn default() -> Self {
        Self {
            columns: SCREEN_COLUMNS as u16,
            rows: SCREEN_ROWS as u16,
            char_width: CELL_WIDTH as u16,
            char_height: CELL_HEIGHT as u16,
            graphics_width: CANVAS_WIDTH as u16,
            graphics_height: CANVAS_HEIGHT as u16,
            video_memory_start: VIDEO_START_ADDR,
            video_memory_end: VIDEO_END_ADDR,
            text_mode: true,
            fg_color: Color { r: 0, g: 255, b: 0 },
            bg_color: Color { r: 0, g: 0, b: 0 },
            char_rom: build_char_rom(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_graphics_code() {
        assert!(!is_graphics_code(0));
        assert!(!is_graphics_code(0x41));
        assert!(!is_graphics_code(127));
        assert!(is_graphics_code(128));
        assert!(is_graphics_code(191));
        assert!(!is_graphics_code(192));
        assert!(!is_graphics_code(255));
    }

    #[test]
    fn test_color_display() {
        let fg = Color { r: 0, g: 255, b: 0 };
        assert_eq!("#00FF00", fg.to_string());

        let bg = Color { r: 0, g: 0, b: 0 };
        assert_eq!("#000000", bg.to_string());
    }

    #[test]
    fn test_char_rom_block_glyphs() {
        let video = VideoEncoder::new();

        // Code 128 is the empty block, code 191 the full block.
        let empty = video.glyph(128);
        let full = video.glyph(191);
        for y in 0..12 {
            for x in 0..8 {
                assert!(!empty.pixel(x, y));
                assert!(full.pixel(x, y));
            }
        }

        // Pattern 0x20 is the top left sub pixel only.
        let top_left = video.glyph(128 + 0x20);
        assert!(top_left.pixel(0, 0));
        assert!(top_left.pixel(3, 3));
        assert!(!top_left.pixel(4, 0));
        assert!(!top_left.pixel(0, 4));
    }

    #[test]
    fn test_char_rom_wraparound() {
        let video = VideoEncoder::new();

        for code in 128..=191u8 {
            assert_eq!(*video.glyph(code), *video.glyph(code + 64));
        }
    }

    #[test]
    fn test_char_rom_text_glyphs() {
        let video = VideoEncoder::new();

        // Control codes are blank, printable codes are not.
        assert_eq!(CharacterGlyph::blank(), *video.glyph(0));
        assert_eq!(CharacterGlyph::blank(), *video.glyph(31));
        assert_eq!(CharacterGlyph::blank(), *video.glyph(b' '));
        assert_ne!(CharacterGlyph::blank(), *video.glyph(b'A'));
        assert_ne!(CharacterGlyph::blank(), *video.glyph(b'z'));
    }

    #[test]
    fn test_set_pixel_and_point_pixel() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        assert_eq!(0, video.point_pixel(10, 10, &bus));
        assert!(video.set_pixel(10, 10, &mut bus));
        assert_eq!(-1, video.point_pixel(10, 10, &bus));

        // Neighbors within the same block stay off.
        assert_eq!(0, video.point_pixel(11, 10, &bus));
        assert_eq!(0, video.point_pixel(10, 11, &bus));
    }

    #[test]
    fn test_set_pixel_out_of_range() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        assert!(!video.set_pixel(-1, 0, &mut bus));
        assert!(!video.set_pixel(0, -1, &mut bus));
        assert!(!video.set_pixel(128, 0, &mut bus));
        assert!(!video.set_pixel(0, 48, &mut bus));

        let non_blank = video
            .screen_snapshot(&bus)
            .iter()
            .flatten()
            .any(|cell| *cell != 0);
        assert!(!non_blank);
    }

    #[test]
    fn test_set_pixel_block_encoding() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        // Top row of block (0, 0): left then right.
        assert!(video.set_pixel(0, 0, &mut bus));
        assert_eq!(128 + 0x20, bus.read_byte(0x3C00));

        assert!(video.set_pixel(1, 0, &mut bus));
        assert_eq!(128 + 0x30, bus.read_byte(0x3C00));
    }

    #[test]
    fn test_set_pixel_replaces_text_cell() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        // A text glyph in the target cell is replaced outright, not merged.
        video.write_string(&mut bus, "A", 0, 0);
        assert!(video.set_pixel(0, 0, &mut bus));
        assert_eq!(128 + 0x20, bus.read_byte(0x3C00));
    }

    #[test]
    fn test_set_pixel_block_addressing() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        // Canvas coordinate (127, 47) is the bottom right sub pixel of the last cell.
        assert!(video.set_pixel(127, 47, &mut bus));
        assert_eq!(128 + 0x01, bus.read_byte(0x3FFF));

        // Canvas coordinate (2, 3) is the top left sub pixel of block (1, 1).
        assert!(video.set_pixel(2, 3, &mut bus));
        assert_eq!(128 + 0x20, bus.read_byte(0x3C41));
    }

    #[test]
    fn test_reset_pixel() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        assert!(video.set_pixel(5, 5, &mut bus));
        assert_eq!(-1, video.point_pixel(5, 5, &bus));

        assert!(video.reset_pixel(5, 5, &mut bus));
        assert_eq!(0, video.point_pixel(5, 5, &bus));

        // The cell stays a graphics block after the reset.
        assert_eq!(128, bus.read_byte(video.block_address(5, 5)));
    }

    #[test]
    fn test_reset_pixel_non_graphics_cell() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        video.write_string(&mut bus, "A", 0, 0);

        assert!(!video.reset_pixel(0, 0, &mut bus));
        assert_eq!(0x41, bus.read_byte(0x3C00));
    }

    #[test]
    fn test_reset_pixel_out_of_range() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        assert!(!video.reset_pixel(-1, 0, &mut bus));
        assert!(!video.reset_pixel(128, 47, &mut bus));
    }

    #[test]
    fn test_point_pixel_sentinels() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        assert_eq!(0, video.point_pixel(-1, 0, &bus));
        assert_eq!(0, video.point_pixel(0, 48, &bus));

        // A text glyph reports every covered pixel as off.
        video.write_string(&mut bus, "A", 0, 0);
        assert_eq!(0, video.point_pixel(0, 0, &bus));

        // So does a wraparound block code, which is not a graphics block.
        bus.write_byte(0x3C00, 255);
        assert_eq!(0, video.point_pixel(0, 0, &bus));
    }

    #[test]
    fn test_block_value_extremes() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        bus.write_byte(0x3C00, 128);
        for y in 0..3 {
            for x in 0..2 {
                assert_eq!(0, video.point_pixel(x, y, &bus));
            }
        }

        bus.write_byte(0x3C00, 191);
        for y in 0..3 {
            for x in 0..2 {
                assert_eq!(-1, video.point_pixel(x, y, &bus));
            }
        }
    }

    #[test]
    fn test_write_string() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        video.write_string(&mut bus, "READY", 1, 2);

        assert_eq!(b'R', bus.read_byte(0x3C42));
        assert_eq!(b'E', bus.read_byte(0x3C43));
        assert_eq!(b'A', bus.read_byte(0x3C44));
        assert_eq!(b'D', bus.read_byte(0x3C45));
        assert_eq!(b'Y', bus.read_byte(0x3C46));
    }

    #[test]
    fn test_clear_screen() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        video.write_string(&mut bus, "HELLO", 0, 0);
        video.set_pixel(0, 47, &mut bus);

        video.clear_screen(&mut bus);

        let cells = video.screen_snapshot(&bus);
        let non_blank = cells.iter().flatten().any(|cell| *cell != BLANK_CODE);
        assert!(!non_blank);
    }

    #[test]
    fn test_screen_snapshot() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        video.write_string(&mut bus, "HI", 2, 3);
        bus.write_byte(0x3FFF, 191);

        let cells = video.screen_snapshot(&bus);
        assert_eq!(b'H', cells[2][3]);
        assert_eq!(b'I', cells[2][4]);
        assert_eq!(191, cells[15][63]);
    }

    #[test]
    fn test_graphics_snapshot() {
        let mut bus = MemoryBus::new();
        let video = VideoEncoder::new();

        video.set_pixel(0, 0, &mut bus);
        video.set_pixel(127, 47, &mut bus);

        // Text cells contribute zeros even though their glyphs have lit pixels.
        video.write_string(&mut bus, "A", 5, 5);

        let pixels = video.graphics_snapshot(&bus);
        assert_eq!(1, pixels[0][0]);
        assert_eq!(0, pixels[0][1]);
        assert_eq!(1, pixels[47][127]);
        assert_eq!(0, pixels[15][10]);

        let lit: usize = pixels.iter().flatten().map(|p| *p as usize).sum();
        assert_eq!(2, lit);
    }

    #[test]
    fn test_text_mode_flag_is_presentational() {
        let mut bus = MemoryBus::new();
        let mut video = VideoEncoder::new();
        assert!(video.text_mode);

        // Pixel operations behave identically with the flag cleared.
        video.text_mode = false;
        assert!(video.set_pixel(0, 0, &mut bus));
        assert_eq!(-1, video.point_pixel(0, 0, &bus));
    }
}
