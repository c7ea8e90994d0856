//! Core domain types for nuptia
//!
//! These types represent the canonical data model (Layer 1) for a wedding
//! plan: the wedding itself plus the collections that hang off it.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Wedding** | The event being planned; owns every other record |
//! | **Guest** | An invited party; one record may cover several attendees |
//! | **Task** | A planning to-do with priority, status, and optional due date |
//! | **BudgetItem** | A planned expense with estimated and (later) actual cost |
//! | **Vendor** | A supplier being sourced, from first inquiry to final payment |
//! | **TimelineEvent** | A dated planning milestone with a completion flag |
//! | **Pledge** | A guest's committed monetary contribution |
//!
//! Derived analytics (Layer 2) live at the bottom of this module:
//! [`AnalyticsSnapshot`], [`WeeklySnapshot`], and [`EngagementMetrics`] are
//! pure functions of the Layer 1 records and can be discarded and
//! regenerated at any time.
//!
//! All monetary fields are [`Decimal`] and serialize as decimal strings,
//! never floats, so client-facing amounts keep their exact value.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================
// Wedding
// ============================================

/// Lifecycle status of a wedding plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeddingStatus {
    /// Actively being planned
    #[default]
    Planning,
    /// Wedding week: vendors confirmed, logistics underway
    InProgress,
    /// The event has taken place
    Completed,
    /// Plan was called off
    Cancelled,
}

impl WeddingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeddingStatus::Planning => "planning",
            WeddingStatus::InProgress => "in_progress",
            WeddingStatus::Completed => "completed",
            WeddingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for WeddingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WeddingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(WeddingStatus::Planning),
            "in_progress" => Ok(WeddingStatus::InProgress),
            "completed" => Ok(WeddingStatus::Completed),
            "cancelled" => Ok(WeddingStatus::Cancelled),
            _ => Err(format!("unknown wedding status: {}", s)),
        }
    }
}

/// The wedding being planned. Owns guests, tasks, budget items, vendors,
/// timeline events, and pledges; has at most one analytics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wedding {
    /// Unique identifier
    pub id: String,
    /// First partner's name
    pub partner_one: String,
    /// Second partner's name
    pub partner_two: String,
    /// Date of the event
    pub wedding_date: NaiveDate,
    /// Venue name or address
    pub venue: String,
    /// Budget ceiling agreed with the couple
    pub total_budget: Decimal,
    /// Lifecycle status
    pub status: WeddingStatus,
    /// Free-form notes
    pub description: String,
    /// When this record was created
    pub created_at: DateTime<Utc>,
    /// When this record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Wedding {
    /// Create a new wedding in planning state with a fresh ID.
    pub fn new(
        partner_one: impl Into<String>,
        partner_two: impl Into<String>,
        wedding_date: NaiveDate,
        venue: impl Into<String>,
        total_budget: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            partner_one: partner_one.into(),
            partner_two: partner_two.into(),
            wedding_date,
            venue: venue.into(),
            total_budget,
            status: WeddingStatus::Planning,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Display name, e.g. "Amina & Jabari".
    pub fn display_name(&self) -> String {
        format!("{} & {}", self.partner_one, self.partner_two)
    }
}

// ============================================
// Guests
// ============================================

/// How a guest is related to the couple
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Family,
    Friend,
    Colleague,
    Other,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Family => "family",
            Relationship::Friend => "friend",
            Relationship::Colleague => "colleague",
            Relationship::Other => "other",
        }
    }

    /// The full category set, in the order breakdowns report them.
    pub const ALL: [Relationship; 4] = [
        Relationship::Family,
        Relationship::Friend,
        Relationship::Colleague,
        Relationship::Other,
    ];
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "family" => Ok(Relationship::Family),
            "friend" => Ok(Relationship::Friend),
            "colleague" => Ok(Relationship::Colleague),
            "other" => Ok(Relationship::Other),
            _ => Err(format!("unknown relationship: {}", s)),
        }
    }
}

/// A guest's response to their invitation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    /// Invitation sent, no reply yet
    #[default]
    Pending,
    /// Attending
    Confirmed,
    /// Not attending
    Declined,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Pending => "pending",
            RsvpStatus::Confirmed => "confirmed",
            RsvpStatus::Declined => "declined",
        }
    }

    /// A declined invitation still counts as a response.
    pub fn has_responded(&self) -> bool {
        !matches!(self, RsvpStatus::Pending)
    }
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RsvpStatus::Pending),
            "confirmed" => Ok(RsvpStatus::Confirmed),
            "declined" => Ok(RsvpStatus::Declined),
            _ => Err(format!("unknown rsvp status: {}", s)),
        }
    }
}

/// An invited party. One guest record covers `party_size` attendees
/// (the invitee plus any plus-ones), so "invitations sent" counts records
/// while headcounts sum `party_size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    /// Unique identifier
    pub id: String,
    /// Wedding this guest belongs to
    pub wedding_id: String,
    /// Primary invitee name
    pub name: String,
    /// Phone number (optional, free-form)
    pub phone: String,
    /// Email address (optional)
    pub email: String,
    /// Relationship to the couple
    pub relationship: Relationship,
    /// Invitation response status
    pub rsvp_status: RsvpStatus,
    /// Number of people covered by this invitation (>= 1)
    pub party_size: i64,
    /// Dietary notes; empty when none were given
    pub dietary_notes: String,
    /// When this record was created
    pub created_at: DateTime<Utc>,
}

// ============================================
// Tasks
// ============================================

/// Priority of a planning task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            _ => Err(format!("unknown task priority: {}", s)),
        }
    }
}

/// Workflow status of a planning task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Whether the task still needs work (todo or in_progress).
    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Done)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!("unknown task status: {}", s)),
        }
    }
}

/// A planning to-do item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Wedding this task belongs to
    pub wedding_id: String,
    /// Short title
    pub title: String,
    /// Longer description (optional)
    pub description: String,
    /// Priority
    pub priority: TaskPriority,
    /// Workflow status
    pub status: TaskStatus,
    /// Deadline, if one was set
    pub due_date: Option<NaiveDate>,
    /// Person responsible (free-form)
    pub assigned_to: String,
    /// Expected cost of completing the task, if known
    pub cost: Option<Decimal>,
    /// When this record was created
    pub created_at: DateTime<Utc>,
    /// When this record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A task is overdue when its deadline has passed and it is still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        matches!(self.due_date, Some(due) if due < today) && self.status.is_open()
    }
}

// ============================================
// Budget
// ============================================

/// Spending category for a budget item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    Venue,
    Catering,
    Decoration,
    Photography,
    Music,
    Transportation,
    Accommodation,
    Attire,
    Invitation,
    Other,
}

impl BudgetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetCategory::Venue => "venue",
            BudgetCategory::Catering => "catering",
            BudgetCategory::Decoration => "decoration",
            BudgetCategory::Photography => "photography",
            BudgetCategory::Music => "music",
            BudgetCategory::Transportation => "transportation",
            BudgetCategory::Accommodation => "accommodation",
            BudgetCategory::Attire => "attire",
            BudgetCategory::Invitation => "invitation",
            BudgetCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BudgetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "venue" => Ok(BudgetCategory::Venue),
            "catering" => Ok(BudgetCategory::Catering),
            "decoration" => Ok(BudgetCategory::Decoration),
            "photography" => Ok(BudgetCategory::Photography),
            "music" => Ok(BudgetCategory::Music),
            "transportation" => Ok(BudgetCategory::Transportation),
            "accommodation" => Ok(BudgetCategory::Accommodation),
            "attire" => Ok(BudgetCategory::Attire),
            "invitation" => Ok(BudgetCategory::Invitation),
            "other" => Ok(BudgetCategory::Other),
            _ => Err(format!("unknown budget category: {}", s)),
        }
    }
}

/// A planned expense line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetItem {
    /// Unique identifier
    pub id: String,
    /// Wedding this item belongs to
    pub wedding_id: String,
    /// Spending category
    pub category: BudgetCategory,
    /// What the money is for
    pub item_name: String,
    /// Estimated cost when the item was planned
    pub estimated_cost: Decimal,
    /// What was actually paid; None until an invoice lands
    pub actual_cost: Option<Decimal>,
    /// Free-form notes
    pub notes: String,
    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl BudgetItem {
    /// Actual cost, treating "not yet invoiced" as zero spend.
    pub fn actual_or_zero(&self) -> Decimal {
        self.actual_cost.unwrap_or(Decimal::ZERO)
    }
}

// ============================================
// Vendors
// ============================================

/// Kind of service a vendor provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorType {
    Venue,
    Catering,
    Photography,
    Music,
    Florist,
    Transport,
    Other,
}

impl VendorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorType::Venue => "venue",
            VendorType::Catering => "catering",
            VendorType::Photography => "photography",
            VendorType::Music => "music",
            VendorType::Florist => "florist",
            VendorType::Transport => "transport",
            VendorType::Other => "other",
        }
    }
}

impl std::fmt::Display for VendorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VendorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "venue" => Ok(VendorType::Venue),
            "catering" => Ok(VendorType::Catering),
            "photography" => Ok(VendorType::Photography),
            "music" => Ok(VendorType::Music),
            "florist" => Ok(VendorType::Florist),
            "transport" => Ok(VendorType::Transport),
            "other" => Ok(VendorType::Other),
            _ => Err(format!("unknown vendor type: {}", s)),
        }
    }
}

/// Sourcing status of a vendor, from first contact to settled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    /// First contact made
    #[default]
    Inquiry,
    /// Quotes and terms being discussed
    Negotiating,
    /// Contract signed
    Booked,
    /// Service delivered and paid
    Completed,
    /// Not going with this vendor
    Rejected,
}

impl VendorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorStatus::Inquiry => "inquiry",
            VendorStatus::Negotiating => "negotiating",
            VendorStatus::Booked => "booked",
            VendorStatus::Completed => "completed",
            VendorStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VendorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inquiry" => Ok(VendorStatus::Inquiry),
            "negotiating" => Ok(VendorStatus::Negotiating),
            "booked" => Ok(VendorStatus::Booked),
            "completed" => Ok(VendorStatus::Completed),
            "rejected" => Ok(VendorStatus::Rejected),
            _ => Err(format!("unknown vendor status: {}", s)),
        }
    }
}

/// A supplier being sourced for the wedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    /// Unique identifier
    pub id: String,
    /// Wedding this vendor belongs to
    pub wedding_id: String,
    /// Business name
    pub name: String,
    /// Kind of service provided
    pub vendor_type: VendorType,
    /// Sourcing status
    pub status: VendorStatus,
    /// Quoted price, once received
    pub quote: Option<Decimal>,
    /// Deposit paid on booking
    pub deposit: Option<Decimal>,
    /// Final settled amount, once paid in full
    pub final_amount: Option<Decimal>,
    /// Contact email (optional)
    pub contact_email: String,
    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Vendor {
    /// Best-known cost for this vendor: the settled amount if paid,
    /// otherwise the quote, otherwise zero.
    pub fn committed_cost(&self) -> Decimal {
        self.final_amount
            .or(self.quote)
            .unwrap_or(Decimal::ZERO)
    }
}

// ============================================
// Timeline
// ============================================

/// Planning milestone vocabulary. The display name doubles as the key in
/// the per-milestone completion map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneType {
    VenueBooking,
    SaveTheDates,
    InvitationsSent,
    MenuTasting,
    DressFitting,
    Rehearsal,
    FinalHeadcount,
    Other,
}

impl MilestoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneType::VenueBooking => "venue_booking",
            MilestoneType::SaveTheDates => "save_the_dates",
            MilestoneType::InvitationsSent => "invitations_sent",
            MilestoneType::MenuTasting => "menu_tasting",
            MilestoneType::DressFitting => "dress_fitting",
            MilestoneType::Rehearsal => "rehearsal",
            MilestoneType::FinalHeadcount => "final_headcount",
            MilestoneType::Other => "other",
        }
    }

    /// Human-friendly label used in reports and the milestone map.
    pub fn display_name(&self) -> &'static str {
        match self {
            MilestoneType::VenueBooking => "Venue Booking",
            MilestoneType::SaveTheDates => "Save the Dates",
            MilestoneType::InvitationsSent => "Invitations Sent",
            MilestoneType::MenuTasting => "Menu Tasting",
            MilestoneType::DressFitting => "Dress Fitting",
            MilestoneType::Rehearsal => "Rehearsal",
            MilestoneType::FinalHeadcount => "Final Headcount",
            MilestoneType::Other => "Other",
        }
    }
}

impl std::fmt::Display for MilestoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MilestoneType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "venue_booking" => Ok(MilestoneType::VenueBooking),
            "save_the_dates" => Ok(MilestoneType::SaveTheDates),
            "invitations_sent" => Ok(MilestoneType::InvitationsSent),
            "menu_tasting" => Ok(MilestoneType::MenuTasting),
            "dress_fitting" => Ok(MilestoneType::DressFitting),
            "rehearsal" => Ok(MilestoneType::Rehearsal),
            "final_headcount" => Ok(MilestoneType::FinalHeadcount),
            "other" => Ok(MilestoneType::Other),
            _ => Err(format!("unknown milestone type: {}", s)),
        }
    }
}

/// A dated planning milestone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Unique identifier
    pub id: String,
    /// Wedding this event belongs to
    pub wedding_id: String,
    /// Which milestone this is
    pub event_type: MilestoneType,
    /// When the milestone is (or was) due
    pub event_date: NaiveDate,
    /// Whether it has been completed
    pub is_completed: bool,
    /// When this record was created
    pub created_at: DateTime<Utc>,
}

// ============================================
// Pledges
// ============================================

/// Payment status of a guest pledge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PledgeStatus {
    /// Committed, nothing paid yet
    #[default]
    Pledged,
    /// Some payments received
    Partial,
    /// Fully paid
    Paid,
    /// Withdrawn
    Cancelled,
}

impl PledgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PledgeStatus::Pledged => "pledged",
            PledgeStatus::Partial => "partial",
            PledgeStatus::Paid => "paid",
            PledgeStatus::Cancelled => "cancelled",
        }
    }

    /// The full status set, in the order breakdowns report them.
    pub const ALL: [PledgeStatus; 4] = [
        PledgeStatus::Pledged,
        PledgeStatus::Partial,
        PledgeStatus::Paid,
        PledgeStatus::Cancelled,
    ];
}

impl std::fmt::Display for PledgeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PledgeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pledged" => Ok(PledgeStatus::Pledged),
            "partial" => Ok(PledgeStatus::Partial),
            "paid" => Ok(PledgeStatus::Paid),
            "cancelled" => Ok(PledgeStatus::Cancelled),
            _ => Err(format!("unknown pledge status: {}", s)),
        }
    }
}

/// A guest's committed monetary contribution, tracked as a simple ledger
/// of pledged versus paid amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pledge {
    /// Unique identifier
    pub id: String,
    /// Wedding this pledge belongs to
    pub wedding_id: String,
    /// Guest who made the pledge, if linked
    pub guest_id: Option<String>,
    /// Amount committed
    pub pledged_amount: Decimal,
    /// Amount received so far
    pub paid_amount: Decimal,
    /// Payment status
    pub payment_status: PledgeStatus,
    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Pledge {
    /// Outstanding balance on this pledge.
    pub fn balance(&self) -> Decimal {
        self.pledged_amount - self.paid_amount
    }
}

// ============================================
// Analytics (Layer 2 - Derived)
// ============================================

/// Per-category budget rollup inside [`AnalyticsSnapshot`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Sum of estimated costs in this category
    pub estimated: Decimal,
    /// Sum of actual costs in this category (missing actuals count as zero)
    pub actual: Decimal,
    /// Number of budget items in this category
    pub item_count: i64,
}

/// Per-milestone completion entry inside [`AnalyticsSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneStatus {
    /// Whether the milestone has been completed
    pub completed: bool,
    /// When the milestone is (or was) due
    pub event_date: NaiveDate,
    /// Days from "today" to the milestone date; negative once it has passed
    pub days_until_event: i64,
}

/// Denormalized analytics for a wedding.
///
/// A pure function of the Layer 1 collections at computation time: it is
/// recomputed in full on every request and overwritten in place, never
/// patched incrementally. Holds no independent truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Wedding these analytics belong to
    pub wedding_id: String,
    /// When this snapshot was computed
    pub computed_at: DateTime<Utc>,

    // Guest analytics
    /// Number of guest records (one invitation per record)
    pub total_invitations_sent: i64,
    /// Invitations confirmed
    pub total_confirmed: i64,
    /// Invitations awaiting a reply
    pub total_pending: i64,
    /// Invitations declined
    pub total_declined: i64,
    /// Mean party size across guest records (1.0 when there are none)
    pub average_guests_per_invitation: f64,

    // Budget analytics
    /// Sum of estimated costs across all budget items
    pub total_estimated_budget: Decimal,
    /// Sum of actual costs (missing actuals count as zero)
    pub total_actual_spending: Decimal,
    /// Actual minus estimated; positive means overspend
    pub budget_variance: Decimal,
    /// Rollup per spending category
    pub budget_category_breakdown: BTreeMap<String, CategoryBreakdown>,

    // Task analytics
    /// Total number of tasks
    pub total_tasks: i64,
    /// Tasks with status done
    pub completed_tasks: i64,
    /// Tasks still open (todo or in_progress)
    pub pending_tasks: i64,
    /// Open tasks whose due date has passed
    pub overdue_tasks: i64,
    /// completed / total * 100 (0 when there are no tasks)
    pub completion_percentage: f64,

    // Vendor analytics
    /// Total number of vendors
    pub total_vendors: i64,
    /// Vendors with status booked
    pub vendors_booked: i64,
    /// Mean of all received quotes (0 when none)
    pub average_vendor_quote: Decimal,
    /// Sum of committed costs (final amount, else quote, else zero)
    pub total_vendor_cost: Decimal,

    // Timeline analytics
    /// Days from today to the wedding, floored at zero
    pub days_until_wedding: i64,
    /// days_until_wedding / 7, integer division
    pub weeks_until_wedding: i64,
    /// Completion entry per milestone label
    pub completion_by_milestone: BTreeMap<String, MilestoneStatus>,

    // Health scores
    /// 100 on/under budget, falling linearly with the overspend ratio.
    /// Deliberately uncapped above 100 when under budget.
    pub budget_health_score: f64,
    /// Completion percentage minus an overdue penalty, floored at zero
    pub task_health_score: f64,
    /// RSVP response rate (declines count as responses)
    pub guest_health_score: f64,
    /// Share of milestones completed
    pub planning_health_score: f64,
    /// Unweighted mean of the four component scores
    pub overall_health_score: f64,
}

/// Immutable point-in-time trend record, keyed by ISO week number.
///
/// Append-only: creating a snapshot twice in the same week produces two
/// rows with the same `week_number`. History is never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySnapshot {
    /// Database ID (auto-incremented)
    pub id: i64,
    /// Wedding this snapshot belongs to
    pub wedding_id: String,
    /// ISO week number at capture time
    pub week_number: u32,
    /// Confirmed invitations at capture time
    pub confirmed_count: i64,
    /// Pending invitations at capture time
    pub pending_count: i64,
    /// Sum of actual costs to date
    pub spending_to_date: Decimal,
    /// Tasks done at capture time
    pub tasks_completed: i64,
    /// Tasks still open at capture time
    pub tasks_pending: i64,
    /// When this snapshot was captured
    pub created_at: DateTime<Utc>,
}

/// Guest engagement patterns for a wedding. One record per wedding,
/// replaced in full on every recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    /// Wedding these metrics belong to
    pub wedding_id: String,
    /// Share of guests who have responded, as a percentage (0 with no guests)
    pub rsvp_response_rate: f64,
    /// Guest count per relationship category, zero-filled over the full set
    pub relationship_breakdown: BTreeMap<String, i64>,
    /// Share of guests with dietary notes, as a percentage
    pub dietary_requirements_percentage: f64,
    /// Guest count per party size
    pub group_size_distribution: BTreeMap<i64, i64>,
    /// When these metrics were computed
    pub computed_at: DateTime<Utc>,
}
