//! RTF document information.
//!
//! The children of the `{\info ...}` group are plain-text destinations, each
//! feeding one field of [`DocumentInfo`].

/// Document information/metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Document title
    pub title: String,
    /// Document subject
    pub subject: String,
    /// Document author
    pub author: String,
    /// Document manager
    pub manager: String,
    /// Company name
    pub company: String,
    /// Operator (last person to modify)
    pub operator: String,
    /// Document category
    pub category: String,
    /// Keywords
    pub keywords: String,
    /// Comments (`\doccomm`)
    pub comment: String,
}

/// Field of [`DocumentInfo`] a plain-text destination writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoField {
    Title,
    Subject,
    Author,
    Manager,
    Company,
    Operator,
    Category,
    Keywords,
    Comment,
}

impl DocumentInfo {
    /// Create a new document info
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[inline]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the author
    #[inline]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Mutable access to one field.
    pub fn field_mut(&mut self, field: InfoField) -> &mut String {
        match field {
            InfoField::Title => &mut self.title,
            InfoField::Subject => &mut self.subject,
            InfoField::Author => &mut self.author,
            InfoField::Manager => &mut self.manager,
            InfoField::Company => &mut self.company,
            InfoField::Operator => &mut self.operator,
            InfoField::Category => &mut self.category,
            InfoField::Keywords => &mut self.keywords,
            InfoField::Comment => &mut self.comment,
        }
    }

    pub fn field(&self, field: InfoField) -> &str {
        match field {
            InfoField::Title => &self.title,
            InfoField::Subject => &self.subject,
            InfoField::Author => &self.author,
            InfoField::Manager => &self.manager,
            InfoField::Company => &self.company,
            InfoField::Operator => &self.operator,
            InfoField::Category => &self.category,
            InfoField::Keywords => &self.keywords,
            InfoField::Comment => &self.comment,
        }
    }

    /// Whether no field has been set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_access() {
        let mut info = DocumentInfo::new().with_title("Report");
        info.field_mut(InfoField::Comment).push_str("draft");
        assert_eq!(info.field(InfoField::Title), "Report");
        assert_eq!(info.comment, "draft");
        assert!(!info.is_empty());
        assert!(DocumentInfo::default().is_empty());
    }
}
