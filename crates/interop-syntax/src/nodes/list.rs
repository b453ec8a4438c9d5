//! Comma-separated node lists.

use std::sync::Arc;

use super::{SyntaxNode, replace_at};
use crate::error::SyntaxError;
use crate::token::Token;

/// An ordered list of nodes interleaved with separator tokens.
///
/// Separator `i` follows item `i`. A list either has one separator fewer
/// than items or, with a trailing separator, exactly as many.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeparatedList<T> {
    items: Arc<[T]>,
    separators: Arc<[Token]>,
}

impl<T> Default for SeparatedList<T> {
    fn default() -> Self {
        Self {
            items: Arc::from(Vec::new()),
            separators: Arc::from(Vec::new()),
        }
    }
}

impl<T: SyntaxNode> SeparatedList<T> {
    /// Creates a list from items and the separators that follow them.
    #[must_use]
    pub fn new(items: Vec<T>, separators: Vec<Token>) -> Self {
        Self {
            items: Arc::from(items),
            separators: Arc::from(separators),
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates the items in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Returns the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// All items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// All separators.
    #[must_use]
    pub fn separators(&self) -> &[Token] {
        &self.separators
    }

    /// Returns a copy with the item at `index` replaced.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::IndexOutOfRange`] if `index` is past the end.
    pub fn replace(&self, index: usize, item: T) -> Result<Self, SyntaxError> {
        if index >= self.items.len() {
            return Err(SyntaxError::index_out_of_range(index, self.items.len()));
        }
        Ok(Self {
            items: replace_at(&self.items, index, item),
            separators: self.separators.clone(),
        })
    }

    /// Returns a copy without the items at `indices`, removed in one pass.
    ///
    /// Survivors keep their relative order. Each survivor keeps the
    /// separator that followed it unless it becomes the last item; a
    /// trailing separator survives only with the original last item. When
    /// the first item is removed the new first item takes over its leading
    /// trivia, so the list keeps its opening layout.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::IndexOutOfRange`] if any index is past the end.
    pub fn remove_all(&self, indices: &[usize]) -> Result<Self, SyntaxError> {
        if let Some(&bad) = indices.iter().find(|&&index| index >= self.items.len()) {
            return Err(SyntaxError::index_out_of_range(bad, self.items.len()));
        }
        let survivors: Vec<usize> = (0..self.items.len())
            .filter(|index| !indices.contains(index))
            .collect();
        let last_original = self.items.len().saturating_sub(1);
        let mut items = Vec::with_capacity(survivors.len());
        let mut separators = Vec::with_capacity(survivors.len());
        for (position, &index) in survivors.iter().enumerate() {
            let Some(item) = self.items.get(index) else {
                continue;
            };
            let item = match (position, self.items.first()) {
                (0, Some(first)) if index != 0 => item.with_leading_trivia(first.leading_trivia()),
                _ => item.clone(),
            };
            items.push(item);
            let is_last_survivor = position + 1 == survivors.len();
            let keeps_separator = !is_last_survivor || index == last_original;
            if keeps_separator {
                if let Some(separator) = self.separators.get(index) {
                    separators.push(separator.clone());
                }
            }
        }
        Ok(Self::new(items, separators))
    }
}

impl<T: SyntaxNode> SyntaxNode for SeparatedList<T> {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        for (index, item) in self.items.iter().enumerate() {
            item.for_each_token(visit);
            if let Some(separator) = self.separators.get(index) {
                visit(separator);
            }
        }
    }

    fn first_token(&self) -> Option<&Token> {
        match self.items.first() {
            Some(item) => item.first_token().or_else(|| self.separators.first()),
            None => None,
        }
    }

    fn last_token(&self) -> Option<&Token> {
        let trailing_separator = self.separators.len() >= self.items.len();
        if trailing_separator {
            if let Some(separator) = self.separators.last() {
                return Some(separator);
            }
        }
        super::last_of(&self.items)
    }

    fn replace_first_token(&self, token: Token) -> Self {
        match self.items.first() {
            Some(first) if first.first_token().is_some() => Self {
                items: replace_at(&self.items, 0, first.replace_first_token(token)),
                separators: self.separators.clone(),
            },
            Some(_) if !self.separators.is_empty() => Self {
                items: self.items.clone(),
                separators: replace_at(&self.separators, 0, token),
            },
            _ => self.clone(),
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        let trailing_separator =
            !self.separators.is_empty() && self.separators.len() >= self.items.len();
        if trailing_separator {
            let last = self.separators.len().saturating_sub(1);
            return Self {
                items: self.items.clone(),
                separators: replace_at(&self.separators, last, token),
            };
        }
        match super::replace_last_of(&self.items, token) {
            Some(items) => Self {
                items,
                separators: self.separators.clone(),
            },
            None => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trivia::Trivia;
    use rstest::rstest;

    fn list(items: &[&str]) -> SeparatedList<Token> {
        let tokens: Vec<Token> = items
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let token = Token::identifier(text);
                if index == 0 {
                    token
                } else {
                    token.with_leading_trivia(vec![Trivia::whitespace(" ")])
                }
            })
            .collect();
        let separators = (1..items.len()).map(|_| Token::punctuation(",")).collect();
        SeparatedList::new(tokens, separators)
    }

    #[rstest]
    #[case(&[1], "a, c")]
    #[case(&[2], "a, b")]
    #[case(&[0], "b, c")]
    #[case(&[0, 2], "b")]
    #[case(&[2, 0], "b")]
    #[case(&[0, 1, 2], "")]
    #[case(&[], "a, b, c")]
    fn remove_all_keeps_survivor_order(#[case] indices: &[usize], #[case] expected: &str) {
        let updated = list(&["a", "b", "c"])
            .remove_all(indices)
            .expect("indices in range");
        assert_eq!(updated.to_full_string(), expected);
    }

    #[test]
    fn remove_all_rejects_out_of_range_indices() {
        let error = list(&["a"]).remove_all(&[3]).expect_err("out of range");
        assert!(matches!(
            error,
            SyntaxError::IndexOutOfRange { index: 3, len: 1 }
        ));
    }

    #[test]
    fn trailing_separator_survives_with_last_item() {
        let items = vec![Token::identifier("a"), Token::identifier("b")];
        let separators = vec![Token::punctuation(","), Token::punctuation(",")];
        let list = SeparatedList::new(items, separators);
        let updated = list.remove_all(&[0]).expect("in range");
        assert_eq!(updated.to_full_string(), "b,");
    }

    #[test]
    fn replace_swaps_single_item() {
        let updated = list(&["a", "b"])
            .replace(1, Token::identifier("z"))
            .expect("in range");
        assert_eq!(updated.to_full_string(), "a,z");
    }
}
