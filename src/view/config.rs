//! Per-screen configuration of a list view.
//!
//! Every marketplace list screen runs the same pipeline; what differs is the
//! endpoint, the page size, which fields are searchable, what the dropdowns
//! mean and where writes go. Those differences live here.

use crate::error::{RentalError, Result};
use crate::query::{FilterSpec, Rule, Selector, SortFields, SortKey};

/// A table column: header plus the attribute path it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub path: String,
}

impl Column {
    fn new(header: &str, path: &str) -> Self {
        Self {
            header: header.to_string(),
            path: path.to_string(),
        }
    }
}

/// Endpoint templates for mutations. `None` means the view cannot perform it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WriteRoutes {
    pub create: Option<String>,
    pub edit: Option<String>,
    pub status: Option<String>,
    pub delete: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub name: String,
    pub title: String,
    /// Read endpoint template; may contain `{user_id}`.
    pub endpoint: String,
    pub page_size: usize,
    pub filter: FilterSpec,
    pub sort_fields: SortFields,
    pub default_sort: SortKey,
    pub status_field: String,
    /// Amount attribute summed by the transaction summary.
    pub amount_field: Option<String>,
    pub routes: WriteRoutes,
    pub required_fields: Vec<String>,
    /// Create bodies carry the signed-in user's id under this attribute.
    pub owner_field: Option<String>,
    /// Only admin sessions may write.
    pub admin_writes: bool,
    pub columns: Vec<Column>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn route(path: &str) -> Option<String> {
    Some(path.to_string())
}

impl ViewConfig {
    /// Names of all presets, in display order.
    pub const NAMES: &[&str] = &[
        "vehicles",
        "listings",
        "transactions",
        "sales",
        "lost-and-found",
        "wishlist",
    ];

    /// Admin vehicle inventory.
    pub fn vehicles() -> Self {
        Self {
            name: "vehicles".to_string(),
            title: "Vehicle inventory".to_string(),
            endpoint: "api/vehicles".to_string(),
            page_size: 9,
            filter: FilterSpec {
                search_fields: strings(&["make", "model", "year", "numberPlate"]),
                category: Selector::none()
                    .with_option("admin", Rule::equals("postedBy", "admin"))
                    .with_option("user", Rule::equals("postedBy", "user")),
                status: Selector::field("status"),
                date_field: "createdAt".to_string(),
                date_filter_enabled: false,
                price_field: Some("priceDay".to_string()),
            },
            sort_fields: SortFields {
                created: "createdAt".to_string(),
                price: Some("priceDay".to_string()),
            },
            default_sort: SortKey::default(),
            status_field: "status".to_string(),
            amount_field: None,
            routes: WriteRoutes {
                create: route("addVehicle"),
                edit: route("api/vehicles/{id}"),
                status: route("api/vehicles/{id}"),
                delete: route("api/vehicles/{id}"),
            },
            required_fields: strings(&[
                "make",
                "model",
                "year",
                "color",
                "totalKm",
                "fuelType",
                "transmission",
                "price",
                "ownership",
                "mileage",
                "seats",
                "engineCC",
                "description",
            ]),
            owner_field: Some("userId".to_string()),
            admin_writes: true,
            columns: vec![
                Column::new("ID", "id"),
                Column::new("Make", "make"),
                Column::new("Model", "model"),
                Column::new("Year", "year"),
                Column::new("Plate", "numberPlate"),
                Column::new("Price/day", "priceDay"),
                Column::new("Status", "status"),
                Column::new("Posted by", "postedBy"),
            ],
        }
    }

    /// Public vehicle listing. Read-only.
    pub fn listings() -> Self {
        Self {
            name: "listings".to_string(),
            title: "Vehicle listing".to_string(),
            endpoint: "vehicles/all".to_string(),
            page_size: 9,
            filter: FilterSpec {
                search_fields: strings(&["make", "model", "year"]),
                category: Selector::field("make"),
                status: Selector::field("status"),
                date_field: "createdAt".to_string(),
                date_filter_enabled: false,
                price_field: Some("priceDay".to_string()),
            },
            sort_fields: SortFields {
                created: "createdAt".to_string(),
                price: Some("priceDay".to_string()),
            },
            default_sort: SortKey::default(),
            status_field: "status".to_string(),
            amount_field: None,
            routes: WriteRoutes::default(),
            required_fields: Vec::new(),
            owner_field: None,
            admin_writes: false,
            columns: vec![
                Column::new("ID", "id"),
                Column::new("Make", "make"),
                Column::new("Model", "model"),
                Column::new("Year", "year"),
                Column::new("Price/day", "priceDay"),
                Column::new("Status", "status"),
            ],
        }
    }

    /// Admin transaction log.
    pub fn transactions() -> Self {
        Self {
            name: "transactions".to_string(),
            title: "Transactions".to_string(),
            endpoint: "api/transaction".to_string(),
            page_size: 5,
            filter: FilterSpec {
                search_fields: strings(&["user.fname", "Booking.User.fname", "Booking.User.email"]),
                category: Selector::field("type"),
                status: Selector::field("status"),
                date_field: "createdAt".to_string(),
                date_filter_enabled: true,
                price_field: Some("amount".to_string()),
            },
            sort_fields: SortFields {
                created: "createdAt".to_string(),
                price: Some("amount".to_string()),
            },
            default_sort: SortKey::default(),
            status_field: "status".to_string(),
            amount_field: Some("amount".to_string()),
            routes: WriteRoutes::default(),
            required_fields: Vec::new(),
            owner_field: None,
            admin_writes: true,
            columns: vec![
                Column::new("ID", "id"),
                Column::new("Customer", "Booking.User.fname"),
                Column::new("Email", "Booking.User.email"),
                Column::new("Type", "type"),
                Column::new("Amount", "amount"),
                Column::new("Status", "status"),
                Column::new("Date", "createdAt"),
            ],
        }
    }

    /// Admin sales report over the same transactions.
    pub fn sales() -> Self {
        Self {
            name: "sales".to_string(),
            title: "Sales".to_string(),
            filter: FilterSpec {
                search_fields: strings(&["user.fname"]),
                date_filter_enabled: false,
                ..Self::transactions().filter
            },
            columns: vec![
                Column::new("ID", "id"),
                Column::new("Customer", "user.fname"),
                Column::new("Type", "type"),
                Column::new("Amount", "amount"),
                Column::new("Status", "status"),
                Column::new("Date", "createdAt"),
            ],
            ..Self::transactions()
        }
    }

    /// Admin lost-and-found moderation.
    pub fn lost_and_found() -> Self {
        Self {
            name: "lost-and-found".to_string(),
            title: "Lost and found".to_string(),
            endpoint: "api/lost-and-found/admin/all".to_string(),
            page_size: 6,
            filter: FilterSpec {
                search_fields: strings(&[
                    "title",
                    "description",
                    "make",
                    "model",
                    "nplate",
                    "location",
                ]),
                category: Selector::none()
                    .with_option("admin", Rule::equals("user.fname", "Admin"))
                    .with_option("user", Rule::not_equals("user.fname", "Admin")),
                status: Selector::none()
                    .with_option("lost", Rule::equals("type", "lost"))
                    .with_option("found", Rule::equals("type", "found"))
                    .with_option("resolved", Rule::not_equals("status", "active")),
                date_field: "date".to_string(),
                date_filter_enabled: true,
                price_field: None,
            },
            sort_fields: SortFields::default(),
            default_sort: SortKey::default(),
            status_field: "status".to_string(),
            amount_field: None,
            routes: WriteRoutes {
                create: route("api/lost-and-found"),
                edit: route("api/lost-and-found/edit/{id}"),
                status: route("api/lost-and-found/resolve/{id}"),
                delete: route("api/lost-and-found/{id}"),
            },
            required_fields: strings(&["title", "description", "type", "location"]),
            owner_field: Some("userId".to_string()),
            admin_writes: true,
            columns: vec![
                Column::new("ID", "id"),
                Column::new("Title", "title"),
                Column::new("Type", "type"),
                Column::new("Status", "status"),
                Column::new("Location", "location"),
                Column::new("Reported by", "user.fname"),
                Column::new("Date", "date"),
            ],
        }
    }

    /// The signed-in user's wishlist.
    pub fn wishlist() -> Self {
        Self {
            name: "wishlist".to_string(),
            title: "Your list".to_string(),
            endpoint: "wishlist/{user_id}".to_string(),
            page_size: 6,
            filter: FilterSpec {
                search_fields: strings(&["vehicleName"]),
                category: Selector::field("purpose"),
                status: Selector::field("status"),
                date_field: "createdAt".to_string(),
                date_filter_enabled: false,
                price_field: None,
            },
            sort_fields: SortFields::default(),
            default_sort: SortKey::default(),
            status_field: "status".to_string(),
            amount_field: None,
            routes: WriteRoutes {
                create: route("api/wishlist"),
                edit: route("wishlist/edit/{id}"),
                status: route("wishlist/edit/{id}"),
                delete: route("wishlist/delete/{id}"),
            },
            required_fields: strings(&["vehicleName", "purpose"]),
            owner_field: None,
            admin_writes: false,
            columns: vec![
                Column::new("ID", "id"),
                Column::new("Vehicle", "vehicleName"),
                Column::new("Purpose", "purpose"),
                Column::new("Status", "status"),
                Column::new("Added", "createdAt"),
            ],
        }
    }

    /// Look up a preset by name.
    pub fn by_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "vehicles" => Ok(Self::vehicles()),
            "listings" => Ok(Self::listings()),
            "transactions" => Ok(Self::transactions()),
            "sales" => Ok(Self::sales()),
            "lost-and-found" | "lost_and_found" => Ok(Self::lost_and_found()),
            "wishlist" => Ok(Self::wishlist()),
            _ => Err(RentalError::UnknownView(name.to_string())),
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::vehicles(),
            Self::listings(),
            Self::transactions(),
            Self::sales(),
            Self::lost_and_found(),
            Self::wishlist(),
        ]
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// True when the view has at least one write route.
    pub fn is_writable(&self) -> bool {
        let r = &self.routes;
        r.create.is_some() || r.edit.is_some() || r.status.is_some() || r.delete.is_some()
    }
}
