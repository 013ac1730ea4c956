//! Effects - side effects declared by the reducer

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Listing plus details for the page starting at `offset`
    LoadPage { offset: usize },
    /// Single-entry lookup; `term` is the text as typed, `id` the normalized identifier
    SearchEntry { term: String, id: String },
    LoadSprite { url: String },
}
