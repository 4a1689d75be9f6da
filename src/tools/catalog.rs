//! The operations exposed to callers and how each maps onto the records API.

use crate::records::Entity;

/// What a tool does with its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    TestConnection,
    Search(Entity),
    Get(Entity),
    Create(Entity),
    Update(Entity),
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ToolKind,
    /// Singular noun used in result messages ("ticket note")
    pub noun: &'static str,
    /// Plural noun used in search messages ("ticket notes")
    pub plural: &'static str,
    /// Argument carrying the record id for get/update tools
    pub id_arg: Option<&'static str>,
}

impl ToolSpec {
    const fn new(
        name: &'static str,
        description: &'static str,
        kind: ToolKind,
        noun: &'static str,
        plural: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            kind,
            noun,
            plural,
            id_arg: None,
        }
    }

    const fn with_id_arg(mut self, arg: &'static str) -> Self {
        self.id_arg = Some(arg);
        self
    }

    /// Whether a successful call changes company names.
    pub fn writes_companies(&self) -> bool {
        matches!(
            self.kind,
            ToolKind::Create(Entity::Companies) | ToolKind::Update(Entity::Companies)
        )
    }
}

/// Records returned by search tools unless `pageSize` says otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const CATALOG: &[ToolSpec] = &[
    ToolSpec::new(
        "test_connection",
        "Test the connection to the records API",
        ToolKind::TestConnection,
        "connection",
        "connections",
    ),
    ToolSpec::new(
        "search_companies",
        "Search for companies with optional filters (searchTerm, isActive, pageSize)",
        ToolKind::Search(Entity::Companies),
        "company",
        "companies",
    ),
    ToolSpec::new(
        "create_company",
        "Create a new company",
        ToolKind::Create(Entity::Companies),
        "company",
        "companies",
    ),
    ToolSpec::new(
        "update_company",
        "Update an existing company (requires id)",
        ToolKind::Update(Entity::Companies),
        "company",
        "companies",
    )
    .with_id_arg("id"),
    ToolSpec::new(
        "search_contacts",
        "Search for contacts with optional filters (searchTerm, companyID, pageSize)",
        ToolKind::Search(Entity::Contacts),
        "contact",
        "contacts",
    ),
    ToolSpec::new(
        "create_contact",
        "Create a new contact",
        ToolKind::Create(Entity::Contacts),
        "contact",
        "contacts",
    ),
    ToolSpec::new(
        "search_tickets",
        "Search for tickets with optional filters (searchTerm, companyID, status, assignedResourceID, pageSize)",
        ToolKind::Search(Entity::Tickets),
        "ticket",
        "tickets",
    ),
    ToolSpec::new(
        "get_ticket_details",
        "Get one ticket by ticketID",
        ToolKind::Get(Entity::Tickets),
        "ticket",
        "tickets",
    )
    .with_id_arg("ticketID"),
    ToolSpec::new(
        "create_ticket",
        "Create a new ticket",
        ToolKind::Create(Entity::Tickets),
        "ticket",
        "tickets",
    ),
    ToolSpec::new(
        "search_projects",
        "Search for projects with optional filters (searchTerm, companyID, status, pageSize)",
        ToolKind::Search(Entity::Projects),
        "project",
        "projects",
    ),
    ToolSpec::new(
        "create_project",
        "Create a new project",
        ToolKind::Create(Entity::Projects),
        "project",
        "projects",
    ),
    ToolSpec::new(
        "search_resources",
        "Search for resources (users) with optional filters (searchTerm, isActive, pageSize)",
        ToolKind::Search(Entity::Resources),
        "resource",
        "resources",
    ),
    ToolSpec::new(
        "search_ticket_notes",
        "Search notes attached to a ticket (ticketID, pageSize)",
        ToolKind::Search(Entity::TicketNotes),
        "ticket note",
        "ticket notes",
    ),
    ToolSpec::new(
        "create_ticket_note",
        "Add a note to a ticket",
        ToolKind::Create(Entity::TicketNotes),
        "ticket note",
        "ticket notes",
    ),
    ToolSpec::new(
        "search_tasks",
        "Search for project tasks with optional filters (searchTerm, projectID, pageSize)",
        ToolKind::Search(Entity::Tasks),
        "task",
        "tasks",
    ),
    ToolSpec::new(
        "create_task",
        "Create a new project task",
        ToolKind::Create(Entity::Tasks),
        "task",
        "tasks",
    ),
    ToolSpec::new(
        "search_contracts",
        "Search for contracts with optional filters (searchTerm, companyID, pageSize)",
        ToolKind::Search(Entity::Contracts),
        "contract",
        "contracts",
    ),
    ToolSpec::new(
        "search_invoices",
        "Search for invoices with optional filters (companyID, pageSize)",
        ToolKind::Search(Entity::Invoices),
        "invoice",
        "invoices",
    ),
];

/// Every tool, in listing order.
pub fn all() -> &'static [ToolSpec] {
    CATALOG
}

/// Look a tool up by name.
pub fn find(name: &str) -> Option<&'static ToolSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}
