// Square mapping: A1=0, B1=1, ..., H8=63
// Every bitboard, move mask and table in the crate uses this mapping.

use crate::eval::{self, Score};
use crate::utils::{
    self, iter_bits, pop_lsb, square_mask, DIAGONAL_DIRECTIONS, NOT_FILE_A, NOT_FILE_H, RANK_1,
    RANK_3, RANK_6, RANK_8, STRAIGHT_DIRECTIONS,
};
use crate::zobrist;

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

    /// Bishops, rooks and queens
    #[inline]
    pub fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    pub fn from_char(ch: char) -> Option<(Color, PieceKind)> {
        let kind = match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some((color, kind))
    }

    pub fn to_char(self, color: Color) -> char {
        let ch = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }
}

// Index into piece_bb: white piece = kind as usize; black piece = 6 + kind as usize
#[inline]
pub fn piece_index(kind: PieceKind, color: Color) -> usize {
    (color as usize) * 6 + (kind as usize)
}

// Castling rights bit layout: bit 3=K, bit 2=Q, bit 1=k, bit 0=q
pub const WHITE_KINGSIDE: u8 = 0b1000;
pub const WHITE_QUEENSIDE: u8 = 0b0100;
pub const BLACK_KINGSIDE: u8 = 0b0010;
pub const BLACK_QUEENSIDE: u8 = 0b0001;
pub const ALL_CASTLING: u8 = 0b1111;

pub const START_LAYOUT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Rights that survive a move touching `sq` (as origin or destination)
#[inline]
fn castling_rights_kept(sq: usize) -> u8 {
    match sq {
        0 => !WHITE_QUEENSIDE,                    // a1
        4 => !(WHITE_KINGSIDE | WHITE_QUEENSIDE), // e1
        7 => !WHITE_KINGSIDE,                     // h1
        56 => !BLACK_QUEENSIDE,                   // a8
        60 => !(BLACK_KINGSIDE | BLACK_QUEENSIDE), // e8
        63 => !BLACK_KINGSIDE,                    // h8
        _ => ALL_CASTLING,
    }
}

/// Rook origin and destination for a castling king landing on `king_to`
#[inline]
fn castling_rook_squares(king_to: usize) -> Option<(usize, usize)> {
    match king_to {
        6 => Some((7, 5)),    // g1: h1 -> f1
        2 => Some((0, 3)),    // c1: a1 -> d1
        62 => Some((63, 61)), // g8: h8 -> f8
        58 => Some((56, 59)), // c8: a8 -> d8
        _ => None,
    }
}

/// Squares attacked by the pawns in `pawns` belonging to `color`
#[inline]
pub fn pawn_attack_mask(pawns: u64, color: Color) -> u64 {
    match color {
        Color::White => ((pawns & NOT_FILE_A) << 7) | ((pawns & NOT_FILE_H) << 9),
        Color::Black => ((pawns & NOT_FILE_A) >> 9) | ((pawns & NOT_FILE_H) >> 7),
    }
}

/// A move as a pair of single-bit masks: departure and destination square.
///
/// Castling is the king's two-square move, en passant is the pawn's diagonal
/// step onto the en-passant square and a pawn reaching the last rank always
/// becomes a queen, so the two masks fully describe every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u64,
    pub to: u64,
}

impl Move {
    #[inline]
    pub fn new(from_sq: usize, to_sq: usize) -> Self {
        Self {
            from: square_mask(from_sq),
            to: square_mask(to_sq),
        }
    }

    #[inline]
    pub fn from_sq(&self) -> usize {
        self.from.trailing_zeros() as usize
    }

    #[inline]
    pub fn to_sq(&self) -> usize {
        self.to.trailing_zeros() as usize
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            utils::square_name(self.from_sq()),
            utils::square_name(self.to_sq())
        )
    }
}

// Undo entry for rollback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    pub mv: Move,
    pub moved: PieceKind,
    pub captured: Option<PieceKind>,
    /// Square of the captured piece (differs from `mv.to` for en passant)
    pub captured_mask: u64,
    pub promoted: bool,
    /// Rook origin | destination for castling, 0 otherwise
    pub rook_mask: u64,
    pub prev_castling: u8,
    pub prev_ep: Option<u8>,
    pub prev_eval: Score,
    pub prev_hash: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    // 12 bitboards: 0-5 = white p,n,b,r,q,k; 6-11 = black p,n,b,r,q,k
    piece_bb: [u64; 12],
    white_occ: u64,
    black_occ: u64,
    side: Color,
    castling: u8,
    ep: Option<u8>,
    eval: Score,
    hash: u64,
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl Position {
    /// Empty board, white to move
    pub fn empty() -> Self {
        Self {
            piece_bb: [0; 12],
            white_occ: 0,
            black_occ: 0,
            side: Color::White,
            castling: 0,
            ep: None,
            eval: 0,
            hash: zobrist::keys().castling[0],
        }
    }

    /// Standard initial position with full castling rights
    pub fn start() -> Self {
        let mut pos = Self::from_layout(START_LAYOUT);
        pos.set_castling_rights(ALL_CASTLING);
        pos
    }

    /// Build a position from the piece-placement field of a FEN string.
    ///
    /// Ranks run from 8 down to 1 separated by `/`, digits skip empty
    /// squares. Anything after the first whitespace is ignored and unknown
    /// characters are skipped; validation belongs to `fen::parse_fen`.
    /// The result has white to move, no castling rights and no en-passant
    /// square.
    pub fn from_layout(layout: &str) -> Self {
        let mut pos = Self::empty();
        let placement = layout.split_whitespace().next().unwrap_or("");

        let mut rank: usize = 7;
        let mut file: usize = 0;
        for ch in placement.chars() {
            if ch == '/' {
                if rank == 0 {
                    break;
                }
                rank -= 1;
                file = 0;
            } else if let Some(skip) = ch.to_digit(10) {
                file += skip as usize;
            } else if let Some((color, kind)) = PieceKind::from_char(ch) {
                if file < 8 {
                    let sq = rank * 8 + file;
                    pos.piece_bb[piece_index(kind, color)] |= square_mask(sq);
                }
                file += 1;
            }
        }

        pos.refresh();
        pos
    }

    // Recompute occupancy, evaluation and hash from the 12 bitboards
    fn refresh(&mut self) {
        // bitboards must be disjoint; the lower piece index wins a clash
        let mut seen = 0u64;
        for bb in self.piece_bb.iter_mut() {
            *bb &= !seen;
            seen |= *bb;
        }
        self.white_occ = self.piece_bb[0..6].iter().fold(0, |acc, bb| acc | bb);
        self.black_occ = self.piece_bb[6..12].iter().fold(0, |acc, bb| acc | bb);
        self.eval = eval::evaluate(self);
        self.hash = zobrist::recalc_zobrist_full(self);
    }

    pub fn set_side_to_move(&mut self, side: Color) {
        self.side = side;
        self.hash = zobrist::recalc_zobrist_full(self);
    }

    /// Castling rights are only kept where king and rook still stand on
    /// their home squares
    pub fn set_castling_rights(&mut self, rights: u8) {
        let mut rights = rights & ALL_CASTLING;
        let home = |kind: PieceKind, color: Color, sq: usize| {
            self.pieces(kind, color) & square_mask(sq) != 0
        };
        if !home(PieceKind::King, Color::White, 4) || !home(PieceKind::Rook, Color::White, 7) {
            rights &= !WHITE_KINGSIDE;
        }
        if !home(PieceKind::King, Color::White, 4) || !home(PieceKind::Rook, Color::White, 0) {
            rights &= !WHITE_QUEENSIDE;
        }
        if !home(PieceKind::King, Color::Black, 60) || !home(PieceKind::Rook, Color::Black, 63) {
            rights &= !BLACK_KINGSIDE;
        }
        if !home(PieceKind::King, Color::Black, 60) || !home(PieceKind::Rook, Color::Black, 56) {
            rights &= !BLACK_QUEENSIDE;
        }
        self.castling = rights;
        self.hash = zobrist::recalc_zobrist_full(self);
    }

    /// En-passant target square; only squares on rank 3 or 6 are accepted
    pub fn set_en_passant(&mut self, sq: Option<usize>) {
        self.ep = sq
            .filter(|&s| s < 64 && square_mask(s) & (RANK_3 | RANK_6) != 0)
            .map(|s| s as u8);
        self.hash = zobrist::recalc_zobrist_full(self);
    }

    // Accessors ----------------------------------------------------

    #[inline]
    pub fn pieces(&self, kind: PieceKind, color: Color) -> u64 {
        self.piece_bb[piece_index(kind, color)]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white_occ,
            Color::Black => self.black_occ,
        }
    }

    #[inline]
    pub fn occupied(&self) -> u64 {
        self.white_occ | self.black_occ
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn castling_rights(&self) -> u8 {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<usize> {
        self.ep.map(|s| s as usize)
    }

    /// Incremental material + piece-square score, white positive
    #[inline]
    pub fn evaluation(&self) -> Score {
        self.eval
    }

    /// En-passant square as a mask, empty unless it lies on the rank the
    /// side to move can capture onto
    #[inline]
    pub fn en_passant_mask(&self) -> u64 {
        let rank = match self.side {
            Color::White => RANK_6,
            Color::Black => RANK_3,
        };
        self.ep.map_or(0, |sq| square_mask(sq as usize) & rank)
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<usize> {
        utils::lsb_index(self.pieces(PieceKind::King, color))
    }

    /// Piece (color, kind) on square `sq`, if any
    pub fn piece_at(&self, sq: usize) -> Option<(Color, PieceKind)> {
        let mask = square_mask(sq);
        let color = if self.white_occ & mask != 0 {
            Color::White
        } else if self.black_occ & mask != 0 {
            Color::Black
        } else {
            return None;
        };
        self.kind_on(mask, color).map(|kind| (color, kind))
    }

    #[inline]
    fn kind_on(&self, mask: u64, color: Color) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces(kind, color) & mask != 0)
    }

    #[inline]
    fn toggle(&mut self, kind: PieceKind, color: Color, mask: u64) {
        self.piece_bb[piece_index(kind, color)] ^= mask;
        match color {
            Color::White => self.white_occ ^= mask,
            Color::Black => self.black_occ ^= mask,
        }
    }

    // Attack queries -------------------------------------------------

    pub fn pawn_attacks(&self, color: Color) -> u64 {
        pawn_attack_mask(self.pieces(PieceKind::Pawn, color), color)
    }

    pub fn knight_attacks(&self, color: Color) -> u64 {
        iter_bits(self.pieces(PieceKind::Knight, color))
            .fold(0, |acc, sq| acc | utils::knight_attacks(sq))
    }

    pub fn king_attacks(&self, color: Color) -> u64 {
        iter_bits(self.pieces(PieceKind::King, color))
            .fold(0, |acc, sq| acc | utils::king_attacks(sq))
    }

    pub fn bishop_attacks(&self, color: Color) -> u64 {
        Self::diagonal_attacks(self.pieces(PieceKind::Bishop, color), self.occupied())
    }

    pub fn rook_attacks(&self, color: Color) -> u64 {
        Self::straight_attacks(self.pieces(PieceKind::Rook, color), self.occupied())
    }

    pub fn queen_attacks(&self, color: Color) -> u64 {
        let queens = self.pieces(PieceKind::Queen, color);
        Self::diagonal_attacks(queens, self.occupied())
            | Self::straight_attacks(queens, self.occupied())
    }

    /// Union of diagonal ray attacks of every piece in `pieces`
    pub fn diagonal_attacks(pieces: u64, occ: u64) -> u64 {
        iter_bits(pieces).fold(0, |acc, sq| acc | utils::diagonal_attacks(sq, occ))
    }

    /// Union of straight ray attacks of every piece in `pieces`
    pub fn straight_attacks(pieces: u64, occ: u64) -> u64 {
        iter_bits(pieces).fold(0, |acc, sq| acc | utils::straight_attacks(sq, occ))
    }

    /// Bishop, rook and queen attacks of `color` against occupancy `occ`
    pub fn sliding_attacks(&self, color: Color, occ: u64) -> u64 {
        let queens = self.pieces(PieceKind::Queen, color);
        let diagonal = self.pieces(PieceKind::Bishop, color) | queens;
        let straight = self.pieces(PieceKind::Rook, color) | queens;
        Self::diagonal_attacks(diagonal, occ) | Self::straight_attacks(straight, occ)
    }

    /// Pawn, knight and king attacks of `color`
    pub fn non_sliding_attacks(&self, color: Color) -> u64 {
        self.pawn_attacks(color) | self.knight_attacks(color) | self.king_attacks(color)
    }

    /// Every square attacked by `color`
    pub fn attacks(&self, color: Color) -> u64 {
        self.sliding_attacks(color, self.occupied()) | self.non_sliding_attacks(color)
    }

    /// Sliding pieces of `by` attacking `sq` through occupancy `occ`
    pub fn slider_attackers_to(&self, sq: usize, by: Color, occ: u64) -> u64 {
        let queens = self.pieces(PieceKind::Queen, by);
        (utils::diagonal_attacks(sq, occ) & (self.pieces(PieceKind::Bishop, by) | queens))
            | (utils::straight_attacks(sq, occ) & (self.pieces(PieceKind::Rook, by) | queens))
    }

    /// Pawns, knights and king of `by` attacking `sq`
    pub fn non_slider_attackers_to(&self, sq: usize, by: Color) -> u64 {
        (pawn_attack_mask(square_mask(sq), by.opposite()) & self.pieces(PieceKind::Pawn, by))
            | (utils::knight_attacks(sq) & self.pieces(PieceKind::Knight, by))
            | (utils::king_attacks(sq) & self.pieces(PieceKind::King, by))
    }

    pub fn is_square_attacked(&self, sq: usize, by: Color) -> bool {
        self.non_slider_attackers_to(sq, by) != 0
            || self.slider_attackers_to(sq, by, self.occupied()) != 0
    }

    /// Whether the side to move has its king attacked
    pub fn in_check(&self) -> bool {
        self.king_square(self.side)
            .is_some_and(|sq| self.is_square_attacked(sq, self.side.opposite()))
    }

    // Make / unmake --------------------------------------------------

    /// Apply a pseudo-legal move and return the information needed to take
    /// it back.
    ///
    /// # Panics
    /// Panics if no piece of the side to move stands on `mv.from`.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let color = self.side;
        let enemy = color.opposite();
        let from = mv.from_sq();
        let to = mv.to_sq();
        let moved = self
            .kind_on(mv.from, color)
            .expect("make_move: no piece of the side to move on the from-square");
        let keys = zobrist::keys();

        let mut undo = Undo {
            mv,
            moved,
            captured: None,
            captured_mask: 0,
            promoted: false,
            rook_mask: 0,
            prev_castling: self.castling,
            prev_ep: self.ep,
            prev_eval: self.eval,
            prev_hash: self.hash,
        };

        // Remove the captured piece (en passant takes the pawn behind `to`)
        if moved == PieceKind::Pawn && mv.to & self.en_passant_mask() != 0 {
            let cap_sq = match color {
                Color::White => to - 8,
                Color::Black => to + 8,
            };
            undo.captured = Some(PieceKind::Pawn);
            undo.captured_mask = square_mask(cap_sq);
        } else if let Some(kind) = self.kind_on(mv.to, enemy) {
            undo.captured = Some(kind);
            undo.captured_mask = mv.to;
        }
        if let Some(kind) = undo.captured {
            let cap_sq = undo.captured_mask.trailing_zeros() as usize;
            self.toggle(kind, enemy, undo.captured_mask);
            self.eval -= eval::piece_value(kind, enemy, cap_sq);
            self.hash ^= keys.piece[piece_index(kind, enemy)][cap_sq];
        }

        // Move the mover, promoting pawns that reach the last rank
        self.toggle(moved, color, mv.from);
        self.eval -= eval::piece_value(moved, color, from);
        self.hash ^= keys.piece[piece_index(moved, color)][from];

        undo.promoted = moved == PieceKind::Pawn && mv.to & (RANK_1 | RANK_8) != 0;
        let placed = if undo.promoted {
            PieceKind::Queen
        } else {
            moved
        };
        self.toggle(placed, color, mv.to);
        self.eval += eval::piece_value(placed, color, to);
        self.hash ^= keys.piece[piece_index(placed, color)][to];

        // Castling: move the rook as well
        if moved == PieceKind::King && from.abs_diff(to) == 2 {
            if let Some((rook_from, rook_to)) = castling_rook_squares(to) {
                undo.rook_mask = square_mask(rook_from) | square_mask(rook_to);
                self.toggle(PieceKind::Rook, color, undo.rook_mask);
                self.eval += eval::piece_value(PieceKind::Rook, color, rook_to)
                    - eval::piece_value(PieceKind::Rook, color, rook_from);
                self.hash ^= keys.piece[piece_index(PieceKind::Rook, color)][rook_from]
                    ^ keys.piece[piece_index(PieceKind::Rook, color)][rook_to];
            }
        }

        // Castling rights
        let new_castling = self.castling & castling_rights_kept(from) & castling_rights_kept(to);
        self.hash ^= keys.castling[self.castling as usize] ^ keys.castling[new_castling as usize];
        self.castling = new_castling;

        // En-passant square
        if let Some(old_ep) = self.ep {
            self.hash ^= keys.ep_file[old_ep as usize % 8];
        }
        self.ep = if moved == PieceKind::Pawn && from.abs_diff(to) == 16 {
            Some(((from + to) / 2) as u8)
        } else {
            None
        };
        if let Some(new_ep) = self.ep {
            self.hash ^= keys.ep_file[new_ep as usize % 8];
        }

        self.side = enemy;
        self.hash ^= keys.side;

        undo
    }

    pub fn unmake_move(&mut self, undo: Undo) {
        let color = self.side.opposite();
        let enemy = self.side;

        if undo.rook_mask != 0 {
            self.toggle(PieceKind::Rook, color, undo.rook_mask);
        }
        let placed = if undo.promoted {
            PieceKind::Queen
        } else {
            undo.moved
        };
        self.toggle(placed, color, undo.mv.to);
        self.toggle(undo.moved, color, undo.mv.from);
        if let Some(kind) = undo.captured {
            self.toggle(kind, enemy, undo.captured_mask);
        }

        self.side = color;
        self.castling = undo.prev_castling;
        self.ep = undo.prev_ep;
        self.eval = undo.prev_eval;
        self.hash = undo.prev_hash;
    }

    /// Commit a move permanently (an accepted game move)
    pub fn process_move(&mut self, mv: Move) {
        self.make_move(mv);
    }

    /// Whether `mv` would leave the mover's own king unattacked
    pub fn leaves_king_safe(&self, mv: Move) -> bool {
        let mover = self.side;
        let mut next = self.clone();
        next.make_move(mv);
        next.king_square(mover)
            .map_or(true, |sq| !next.is_square_attacked(sq, next.side))
    }

    /// A move is legal iff it is one of the generated pseudo-legal moves and
    /// after it the mover's king is not attacked
    pub fn is_legal(&self, mv: Move) -> bool {
        let mut pseudo = Vec::with_capacity(64);
        self.generate_pseudo_moves(&mut pseudo);
        pseudo.contains(&mv) && self.leaves_king_safe(mv)
    }

    /// Fully legal moves for the side to move
    pub fn generate_moves(&self) -> Vec<Move> {
        crate::legal::generate_legal_moves(self)
    }

    // Pseudo-legal move generation -----------------------------------

    pub fn generate_pseudo_moves(&self, out: &mut Vec<Move>) {
        for kind in PieceKind::ALL {
            self.generate_pseudo_moves_for(kind, out);
        }
    }

    pub fn generate_pseudo_moves_for(&self, kind: PieceKind, out: &mut Vec<Move>) {
        match kind {
            PieceKind::Pawn => self.generate_pawn_pseudos(self.side, out),
            PieceKind::Knight => self.generate_knight_pseudos(self.side, out),
            PieceKind::Bishop => {
                self.generate_slider_pseudos(kind, &DIAGONAL_DIRECTIONS, self.side, out)
            }
            PieceKind::Rook => {
                self.generate_slider_pseudos(kind, &STRAIGHT_DIRECTIONS, self.side, out)
            }
            PieceKind::Queen => {
                self.generate_slider_pseudos(kind, &STRAIGHT_DIRECTIONS, self.side, out);
                self.generate_slider_pseudos(kind, &DIAGONAL_DIRECTIONS, self.side, out);
            }
            PieceKind::King => self.generate_king_pseudos(self.side, out),
        }
    }

    fn generate_pawn_pseudos(&self, side: Color, out: &mut Vec<Move>) {
        let pawns = self.pieces(PieceKind::Pawn, side);
        let empty = !self.occupied();
        let targets = self.occupancy(side.opposite()) | self.en_passant_mask();

        // (destinations, distance from origin) per pawn move kind
        let (single, double, left, right) = match side {
            Color::White => {
                let single = (pawns << 8) & empty;
                let double = ((single & RANK_3) << 8) & empty;
                let left = ((pawns & NOT_FILE_A) << 7) & targets;
                let right = ((pawns & NOT_FILE_H) << 9) & targets;
                (single, double, left, right)
            }
            Color::Black => {
                let single = (pawns >> 8) & empty;
                let double = ((single & RANK_6) >> 8) & empty;
                let left = ((pawns & NOT_FILE_A) >> 9) & targets;
                let right = ((pawns & NOT_FILE_H) >> 7) & targets;
                (single, double, left, right)
            }
        };
        let offsets: [i8; 4] = match side {
            Color::White => [8, 16, 7, 9],
            Color::Black => [-8, -16, -9, -7],
        };

        for (dest, offset) in [single, double, left, right].into_iter().zip(offsets) {
            let mut bb = dest;
            while let Some(to) = pop_lsb(&mut bb) {
                let from = (to as i8 - offset) as usize;
                out.push(Move::new(from, to));
            }
        }
    }

    fn generate_knight_pseudos(&self, side: Color, out: &mut Vec<Move>) {
        let own = self.occupancy(side);
        let mut knights = self.pieces(PieceKind::Knight, side);
        while let Some(from) = pop_lsb(&mut knights) {
            let mut dest = utils::knight_attacks(from) & !own;
            while let Some(to) = pop_lsb(&mut dest) {
                out.push(Move::new(from, to));
            }
        }
    }

    fn generate_slider_pseudos(
        &self,
        kind: PieceKind,
        directions: &[i8; 4],
        side: Color,
        out: &mut Vec<Move>,
    ) {
        let own = self.occupancy(side);
        let occ = self.occupied();
        let mut pieces = self.pieces(kind, side);
        while let Some(from) = pop_lsb(&mut pieces) {
            for &dir in directions {
                let mut dest = utils::ray_attacks(from, dir, occ) & !own;
                while let Some(to) = pop_lsb(&mut dest) {
                    out.push(Move::new(from, to));
                }
            }
        }
    }

    fn generate_king_pseudos(&self, side: Color, out: &mut Vec<Move>) {
        let own = self.occupancy(side);
        let mut kings = self.pieces(PieceKind::King, side);
        while let Some(from) = pop_lsb(&mut kings) {
            let mut dest = utils::king_attacks(from) & !own;
            while let Some(to) = pop_lsb(&mut dest) {
                out.push(Move::new(from, to));
            }
            self.generate_castling_moves(side, from, out);
        }
    }

    fn generate_castling_moves(&self, side: Color, king_from: usize, out: &mut Vec<Move>) {
        // (right, king start, king target, rook start, squares that must be empty,
        //  squares the king crosses)
        let candidates: [(u8, usize, usize, usize, u64, [usize; 3]); 2] = match side {
            Color::White => [
                (WHITE_KINGSIDE, 4, 6, 7, 0x60, [4, 5, 6]),
                (WHITE_QUEENSIDE, 4, 2, 0, 0x0E, [4, 3, 2]),
            ],
            Color::Black => [
                (BLACK_KINGSIDE, 60, 62, 63, 0x60 << 56, [60, 61, 62]),
                (BLACK_QUEENSIDE, 60, 58, 56, 0x0E << 56, [60, 59, 58]),
            ],
        };
        let enemy = side.opposite();
        let rooks = self.pieces(PieceKind::Rook, side);

        for (right, king_start, king_to, rook_start, empty_mask, path) in candidates {
            if self.castling & right == 0 || king_from != king_start {
                continue;
            }
            if rooks & square_mask(rook_start) == 0 || self.occupied() & empty_mask != 0 {
                continue;
            }
            if path.iter().any(|&sq| self.is_square_attacked(sq, enemy)) {
                continue;
            }
            out.push(Move::new(king_from, king_to));
        }
    }
}

// Simple display: rank 8 on top, '.' for empty squares
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.piece_at(rank * 8 + file) {
                    Some((color, kind)) => write!(f, "{} ", kind.to_char(color))?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}
