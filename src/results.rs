use serde::{Deserialize, Serialize};

/// Name stored when neither the list row nor the detail heading could be read
pub const NO_NAME: &str = "No name found";

/// The optional fields read from a detail panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Address,
    Phone,
    Website,
    Rating,
    Reviews,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Address,
        Field::Phone,
        Field::Website,
        Field::Rating,
        Field::Reviews,
    ];

    /// JSON key of the field
    pub fn key(self) -> &'static str {
        match self {
            Field::Address => "address",
            Field::Phone => "phone",
            Field::Website => "website",
            Field::Rating => "rating",
            Field::Reviews => "reviews",
        }
    }

    /// Placeholder stored when the field could not be read
    pub fn sentinel(self) -> &'static str {
        match self {
            Field::Address => "No address found",
            Field::Phone => "No phone found",
            Field::Website => "No website found",
            Field::Rating => "No rating found",
            Field::Reviews => "No reviews found",
        }
    }

    /// Attribute holding the value, or `None` when the visible text is used
    pub fn attribute(self) -> Option<&'static str> {
        match self {
            Field::Website => Some("href"),
            _ => None,
        }
    }
}

/// One business extracted from the result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub rating: String,
    pub reviews: String,
}

impl BusinessRecord {
    /// Creates a record with every optional field set to its sentinel
    pub fn new(name: Option<String>) -> Self {
        Self {
            name: name.unwrap_or_else(|| NO_NAME.to_string()),
            address: Field::Address.sentinel().to_string(),
            phone: Field::Phone.sentinel().to_string(),
            website: Field::Website.sentinel().to_string(),
            rating: Field::Rating.sentinel().to_string(),
            reviews: Field::Reviews.sentinel().to_string(),
        }
    }

    /// Stores a field value, falling back to the sentinel on `None`
    pub fn set(&mut self, field: Field, value: Option<String>) {
        let value = value.unwrap_or_else(|| field.sentinel().to_string());
        match field {
            Field::Address => self.address = value,
            Field::Phone => self.phone = value,
            Field::Website => self.website = value,
            Field::Rating => self.rating = value,
            Field::Reviews => self.reviews = value,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Address => &self.address,
            Field::Phone => &self.phone,
            Field::Website => &self.website,
            Field::Rating => &self.rating,
            Field::Reviews => &self.reviews,
        }
    }

    /// Whether the field holds a real value rather than its sentinel
    pub fn has(&self, field: Field) -> bool {
        self.get(field) != field.sentinel()
    }

    /// Whether the name was actually read
    pub fn has_name(&self) -> bool {
        self.name != NO_NAME
    }
}

/// Ordered, append-only collection of extracted records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<BusinessRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: BusinessRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[BusinessRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<BusinessRecord> {
        self.records
    }
}
