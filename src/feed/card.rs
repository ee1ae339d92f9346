use crate::fetch::NoteRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardKind {
    Placeholder,
    Note,
}

#[derive(Clone, Debug)]
pub struct Card {
    pub ordinal: usize,
    pub kind: CardKind,
    pub title: String,
    pub body: Vec<String>,
}

impl Card {
    pub fn placeholder(ordinal: usize) -> Self {
        Self {
            ordinal,
            kind: CardKind::Placeholder,
            title: format!("Card {}", ordinal),
            body: Vec::new(),
        }
    }

    pub fn from_note(ordinal: usize, note: &NoteRecord) -> Self {
        let body = vec![
            note.content.clone(),
            format!("created: {}", note.created_at),
            format!("deadline: {}", note.dead_line),
            format!("mode: {}", note.mode),
        ];
        Self {
            ordinal,
            kind: CardKind::Note,
            title: format!("Card {}", ordinal),
            body,
        }
    }

    // Rows occupied in a rendered feed: title, body lines, one blank separator.
    pub fn rows(&self) -> usize {
        1 + self.body.len() + 1
    }
}
