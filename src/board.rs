// Mapping di quadrati: A1=0, B1=1, ..., H8=63
// Stesso mapping per bitboard, tabelle di attacco e FEN

use crate::error::{ChessError, FenField, IllegalReason, Result};
use crate::utils::{parse_square, square_name, test_bit};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Pieces a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Lowercase letter used by FEN and UCI.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_letter(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

// Indice nel piece_bb array: white piece = kind; black piece = 6 + kind
#[inline(always)]
fn piece_index(kind: PieceKind, color: Color) -> usize {
    (color as usize) * 6 + (kind as usize)
}

/// A move: source, destination and optional promotion piece.
/// Captures are not stored; they are read from the board when the move is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: u8,
    to: u8,
    promotion: Option<PieceKind>,
}

impl Move {
    #[inline]
    pub fn new(from: usize, to: usize) -> Self {
        Move {
            from: from as u8,
            to: to as u8,
            promotion: None,
        }
    }

    #[inline]
    pub fn with_promotion(from: usize, to: usize, promotion: PieceKind) -> Self {
        Move {
            from: from as u8,
            to: to as u8,
            promotion: Some(promotion),
        }
    }

    #[inline]
    pub fn from(&self) -> usize {
        self.from as usize
    }

    #[inline]
    pub fn to(&self) -> usize {
        self.to as usize
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Parse long algebraic text ("e2e4", "e7e8q") without consulting a board.
    pub fn from_uci(text: &str) -> Result<Move> {
        let bad = || ChessError::MalformedMove {
            token: text.to_string(),
        };
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(bad());
        }
        let from = parse_square(&text[0..2]).ok_or_else(bad)?;
        let to = parse_square(&text[2..4]).ok_or_else(bad)?;
        match text[4..].chars().next() {
            None => Ok(Move::new(from, to)),
            Some(ch) => match PieceKind::from_letter(ch) {
                Some(p) if PieceKind::PROMOTIONS.contains(&p) => Ok(Move::with_promotion(from, to, p)),
                _ => Err(bad()),
            },
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from()), square_name(self.to()))?;
        if let Some(p) = self.promotion {
            write!(f, "{}", p.letter())?;
        }
        Ok(())
    }
}

/// Castling availability, one flag per side and wing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        white_king_side: false,
        white_queen_side: false,
        black_king_side: false,
        black_queen_side: false,
    };

    pub const ALL: CastlingRights = CastlingRights {
        white_king_side: true,
        white_queen_side: true,
        black_king_side: true,
        black_queen_side: true,
    };

    pub fn king_side(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_side,
            Color::Black => self.black_king_side,
        }
    }

    pub fn queen_side(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queen_side,
            Color::Black => self.black_queen_side,
        }
    }

    pub fn any(&self) -> bool {
        self.white_king_side || self.white_queen_side || self.black_king_side || self.black_queen_side
    }

    fn clear_color(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_king_side = false;
                self.white_queen_side = false;
            }
            Color::Black => {
                self.black_king_side = false;
                self.black_queen_side = false;
            }
        }
    }

    // A rook leaving or being captured on its home corner loses the matching right
    fn clear_corner(&mut self, sq: usize) {
        match sq {
            0 => self.white_queen_side = false,
            7 => self.white_king_side = false,
            56 => self.black_queen_side = false,
            63 => self.black_king_side = false,
            _ => {}
        }
    }
}

/// How a move changed the board beyond moving one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    Quiet,
    Capture { captured: PieceKind },
    EnPassant { captured_sq: u8 },
    Castle { rook_from: u8, rook_to: u8 },
    Promotion { promoted: PieceKind, captured: Option<PieceKind> },
}

/// Everything `unmake_move` needs to restore the position before `mv`.
/// Undo records must be consumed in reverse order of the `make_move` calls that produced them.
#[derive(Debug, Clone)]
pub struct Undo {
    pub mv: Move,
    pub moved: PieceKind,
    pub color: Color,
    pub kind: UndoKind,
    pub prev_castling: CastlingRights,
    pub prev_ep: Option<u8>,
    pub prev_halfmove: u16,
    pub prev_fullmove: u16,
    pub prev_side: Color,
}

impl Undo {
    pub fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            UndoKind::Capture { .. }
                | UndoKind::EnPassant { .. }
                | UndoKind::Promotion { captured: Some(_), .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    // 12 bitboard: 0-5 = white p,n,b,r,q,k; 6-11 = black p,n,b,r,q,k
    piece_bb: [u64; 12],
    white_occ: u64,
    black_occ: u64,
    occ: u64,
    side: Color,
    castling: CastlingRights,
    ep: Option<u8>, // en-passant square index or None
    halfmove: u16,
    fullmove: u16,
}

impl Default for Board {
    fn default() -> Self {
        Board::start_position()
    }
}

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    // Board vuota da popolare via place_piece o FEN
    pub fn new() -> Self {
        Self {
            piece_bb: [0; 12],
            white_occ: 0,
            black_occ: 0,
            occ: 0,
            side: Color::White,
            castling: CastlingRights::NONE,
            ep: None,
            halfmove: 0,
            fullmove: 1,
        }
    }

    pub fn start_position() -> Self {
        let mut board = Board::new();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, &kind) in back_rank.iter().enumerate() {
            board.place_piece(file, kind, Color::White);
            board.place_piece(8 + file, PieceKind::Pawn, Color::White);
            board.place_piece(48 + file, PieceKind::Pawn, Color::Black);
            board.place_piece(56 + file, kind, Color::Black);
        }
        board.castling = CastlingRights::ALL;
        board
    }

    #[inline]
    pub fn piece_bb(&self, kind: PieceKind, color: Color) -> u64 {
        self.piece_bb[piece_index(kind, color)]
    }

    #[inline]
    pub fn occupied(&self) -> u64 {
        self.occ
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white_occ,
            Color::Black => self.black_occ,
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn ep_square(&self) -> Option<usize> {
        self.ep.map(|sq| sq as usize)
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove
    }

    // Restituisce piece (kind,color) su square idx o None
    pub fn piece_on(&self, sq: usize) -> Option<(PieceKind, Color)> {
        if !test_bit(self.occ, sq) {
            return None;
        }
        let color = if test_bit(self.white_occ, sq) {
            Color::White
        } else {
            Color::Black
        };
        PieceKind::ALL
            .into_iter()
            .find(|&kind| test_bit(self.piece_bb(kind, color), sq))
            .map(|kind| (kind, color))
    }

    #[inline]
    pub fn is_occupied(&self, sq: usize) -> bool {
        test_bit(self.occ, sq)
    }

    /// King square for `color`, or None on a board without that king.
    #[inline]
    pub fn king_sq(&self, color: Color) -> Option<usize> {
        crate::utils::lsb_index(self.piece_bb(PieceKind::King, color))
    }

    /// Put a piece on an empty square, updating the aggregate occupancies too.
    #[inline]
    pub fn place_piece(&mut self, sq: usize, kind: PieceKind, color: Color) {
        let bit = 1u64 << sq;
        self.piece_bb[piece_index(kind, color)] |= bit;
        match color {
            Color::White => self.white_occ |= bit,
            Color::Black => self.black_occ |= bit,
        }
        self.occ |= bit;
    }

    /// Take a piece off its square, updating the aggregate occupancies too.
    #[inline]
    pub fn remove_piece(&mut self, sq: usize, kind: PieceKind, color: Color) {
        let bit = !(1u64 << sq);
        self.piece_bb[piece_index(kind, color)] &= bit;
        match color {
            Color::White => self.white_occ &= bit,
            Color::Black => self.black_occ &= bit,
        }
        self.occ &= bit;
    }

    #[inline]
    fn shift_piece(&mut self, from: usize, to: usize, kind: PieceKind, color: Color) {
        self.remove_piece(from, kind, color);
        self.place_piece(to, kind, color);
    }

    /// True when the three aggregates equal the union of the twelve piece sets
    /// and no square holds two pieces.
    pub fn is_consistent(&self) -> bool {
        let mut white = 0u64;
        let mut black = 0u64;
        let mut seen = 0u64;
        for (i, &bb) in self.piece_bb.iter().enumerate() {
            if seen & bb != 0 {
                return false;
            }
            seen |= bb;
            if i < 6 {
                white |= bb;
            } else {
                black |= bb;
            }
        }
        white == self.white_occ && black == self.black_occ && (white | black) == self.occ
    }

    /// Apply `mv` in place and return the record that reverses it.
    ///
    /// The move is trusted to be pseudo-legal for the piece on `from`; only an
    /// empty source square or a capture of an own piece is refused. Use
    /// `play_legal` to validate against the legal move list first.
    pub fn make_move(&mut self, mv: Move) -> Result<Undo> {
        let from = mv.from();
        let to = mv.to();
        let Some((moved, color)) = self.piece_on(from) else {
            return Err(ChessError::IllegalMove {
                mv,
                reason: IllegalReason::EmptySquare,
            });
        };
        let them = color.opposite();
        let target = self.piece_on(to);
        if matches!(target, Some((_, c)) if c == color) {
            return Err(ChessError::IllegalMove {
                mv,
                reason: IllegalReason::NotLegal,
            });
        }

        let prev_castling = self.castling;
        let prev_ep = self.ep;
        let prev_halfmove = self.halfmove;
        let prev_fullmove = self.fullmove;
        let prev_side = self.side;

        let captured = target.map(|(kind, _)| kind);
        let ep_rank = match color {
            Color::White => 5,
            Color::Black => 2,
        };
        let is_en_passant = moved == PieceKind::Pawn
            && prev_ep == Some(to as u8)
            && to / 8 == ep_rank
            && from % 8 != to % 8;
        let kind = if is_en_passant {
            // Il pedone catturato sta una traversa dietro la casa d'arrivo
            let captured_sq = match color {
                Color::White => to - 8,
                Color::Black => to + 8,
            };
            self.remove_piece(captured_sq, PieceKind::Pawn, them);
            self.shift_piece(from, to, PieceKind::Pawn, color);
            UndoKind::EnPassant {
                captured_sq: captured_sq as u8,
            }
        } else {
            if let Some(c) = captured {
                self.remove_piece(to, c, them);
            }
            self.remove_piece(from, moved, color);
            match mv.promotion() {
                Some(promoted) => {
                    self.place_piece(to, promoted, color);
                    UndoKind::Promotion { promoted, captured }
                }
                None => {
                    self.place_piece(to, moved, color);
                    match (moved, captured) {
                        (_, Some(c)) => UndoKind::Capture { captured: c },
                        (PieceKind::King, None) if (from == 4 || from == 60) && from.abs_diff(to) == 2 => {
                            let (rook_from, rook_to) = if to > from {
                                (from + 3, from + 1)
                            } else {
                                (from - 4, from - 1)
                            };
                            if test_bit(self.piece_bb(PieceKind::Rook, color), rook_from) {
                                self.shift_piece(rook_from, rook_to, PieceKind::Rook, color);
                                UndoKind::Castle {
                                    rook_from: rook_from as u8,
                                    rook_to: rook_to as u8,
                                }
                            } else {
                                UndoKind::Quiet
                            }
                        }
                        _ => UndoKind::Quiet,
                    }
                }
            }
        };

        // Diritti di arrocco: re mosso, torre mossa o torre catturata sull'angolo
        if moved == PieceKind::King {
            self.castling.clear_color(color);
        } else if moved == PieceKind::Rook {
            self.castling.clear_corner(from);
        }
        if captured == Some(PieceKind::Rook) {
            self.castling.clear_corner(to);
        }

        self.ep = if moved == PieceKind::Pawn && from.abs_diff(to) == 16 {
            Some(((from + to) / 2) as u8)
        } else {
            None
        };

        let undo = Undo {
            mv,
            moved,
            color,
            kind,
            prev_castling,
            prev_ep,
            prev_halfmove,
            prev_fullmove,
            prev_side,
        };

        if moved == PieceKind::Pawn || undo.is_capture() {
            self.halfmove = 0;
        } else {
            self.halfmove = self.halfmove.saturating_add(1);
        }
        if color == Color::Black {
            self.fullmove = self.fullmove.saturating_add(1);
        }
        self.side = them;

        Ok(undo)
    }

    /// Reverse the `make_move` call that produced `undo`.
    pub fn unmake_move(&mut self, undo: Undo) {
        let from = undo.mv.from();
        let to = undo.mv.to();
        let color = undo.color;
        let them = color.opposite();

        match undo.kind {
            UndoKind::Quiet => self.shift_piece(to, from, undo.moved, color),
            UndoKind::Capture { captured } => {
                self.shift_piece(to, from, undo.moved, color);
                self.place_piece(to, captured, them);
            }
            UndoKind::EnPassant { captured_sq } => {
                self.shift_piece(to, from, PieceKind::Pawn, color);
                self.place_piece(captured_sq as usize, PieceKind::Pawn, them);
            }
            UndoKind::Castle { rook_from, rook_to } => {
                self.shift_piece(to, from, PieceKind::King, color);
                self.shift_piece(rook_to as usize, rook_from as usize, PieceKind::Rook, color);
            }
            UndoKind::Promotion { promoted, captured } => {
                debug_assert!(test_bit(self.piece_bb(promoted, color), to));
                self.remove_piece(to, promoted, color);
                self.place_piece(from, undo.moved, color);
                if let Some(c) = captured {
                    self.place_piece(to, c, them);
                }
            }
        }

        self.castling = undo.prev_castling;
        self.ep = undo.prev_ep;
        self.halfmove = undo.prev_halfmove;
        self.fullmove = undo.prev_fullmove;
        self.side = undo.prev_side;
        debug_assert!(self.is_consistent(), "unmake of {} left inconsistent aggregates", undo.mv);
    }
}

// FEN parsing/serializzazione su Board
impl Board {
    pub fn from_fen(fen: &str) -> Result<Board> {
        let mut board = Board::new();
        board.set_from_fen(fen)?;
        Ok(board)
    }

    /// Load a FEN position. Halfmove clock and fullmove number may be omitted.
    /// On error the board is left unchanged.
    pub fn set_from_fen(&mut self, fen: &str) -> Result<()> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or_else(|| ChessError::fen(FenField::Placement, fen))?;
        let side_part = parts.next().ok_or_else(|| ChessError::fen(FenField::SideToMove, ""))?;
        let castle_part = parts.next().ok_or_else(|| ChessError::fen(FenField::Castling, ""))?;
        let ep_part = parts.next().ok_or_else(|| ChessError::fen(FenField::EnPassant, ""))?;
        let halfmove_part = parts.next();
        let fullmove_part = parts.next();

        let mut board = Board::new();

        // Traverse: dalla 8 alla 1
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::fen(FenField::Placement, placement));
        }
        for (i, rank_part) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0usize;
            for ch in rank_part.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ChessError::fen(FenField::Placement, rank_part));
                    }
                    file += skip as usize;
                } else {
                    let kind = PieceKind::from_letter(ch)
                        .ok_or_else(|| ChessError::fen(FenField::Placement, rank_part))?;
                    if file >= 8 {
                        return Err(ChessError::fen(FenField::Placement, rank_part));
                    }
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    board.place_piece(rank * 8 + file, kind, color);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(ChessError::fen(FenField::Placement, rank_part));
            }
        }
        for color in [Color::White, Color::Black] {
            if board.piece_bb(PieceKind::King, color).count_ones() != 1 {
                return Err(ChessError::fen(FenField::Placement, placement));
            }
        }

        board.side = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(ChessError::fen(FenField::SideToMove, side_part)),
        };

        if castle_part != "-" {
            for ch in castle_part.chars() {
                match ch {
                    'K' => board.castling.white_king_side = true,
                    'Q' => board.castling.white_queen_side = true,
                    'k' => board.castling.black_king_side = true,
                    'q' => board.castling.black_queen_side = true,
                    _ => return Err(ChessError::fen(FenField::Castling, castle_part)),
                }
            }
        }

        // La casa en passant sta dietro il pedone appena spinto dall'avversario
        let ep_rank = match board.side {
            Color::White => 5,
            Color::Black => 2,
        };
        board.ep = match ep_part {
            "-" => None,
            s => match parse_square(s) {
                Some(sq) if sq / 8 == ep_rank => Some(sq as u8),
                _ => return Err(ChessError::fen(FenField::EnPassant, s)),
            },
        };

        if let Some(h) = halfmove_part {
            board.halfmove = h
                .parse()
                .map_err(|_| ChessError::fen(FenField::HalfmoveClock, h))?;
        }
        if let Some(f) = fullmove_part {
            board.fullmove = f
                .parse()
                .map_err(|_| ChessError::fen(FenField::FullmoveNumber, f))?;
        }

        *self = board;
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_on(rank * 8 + file) {
                    Some((kind, color)) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece_char(kind, color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push_str(match self.side {
            Color::White => " w ",
            Color::Black => " b ",
        });

        if self.castling.any() {
            let c = self.castling;
            for (flag, ch) in [
                (c.white_king_side, 'K'),
                (c.white_queen_side, 'Q'),
                (c.black_king_side, 'k'),
                (c.black_queen_side, 'q'),
            ] {
                if flag {
                    fen.push(ch);
                }
            }
        } else {
            fen.push('-');
        }

        match self.ep {
            Some(sq) => fen.push_str(&format!(" {}", square_name(sq as usize))),
            None => fen.push_str(" -"),
        }
        fen.push_str(&format!(" {} {}", self.halfmove, self.fullmove));
        fen
    }
}

fn piece_char(kind: PieceKind, color: Color) -> char {
    match color {
        Color::White => kind.letter().to_ascii_uppercase(),
        Color::Black => kind.letter(),
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.piece_on(rank * 8 + file) {
                    Some((kind, color)) => write!(f, "{} ", piece_char(kind, color))?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}
