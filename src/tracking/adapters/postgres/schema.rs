//! Diesel schema for work-item tracking.

diesel::table! {
    /// Work items for internal teams and customer companies.
    work_items (id) {
        /// Work-item identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Organisation discriminator: `team` or `customer_company`.
        #[max_length = 32]
        org_kind -> Varchar,
        /// Owning team for internal items.
        team_id -> Nullable<Uuid>,
        /// Owning company for customer items.
        company_id -> Nullable<Uuid>,
        /// Current assignee.
        assignee_id -> Nullable<Uuid>,
        /// Assigner of record.
        assigner_id -> Uuid,
        /// Short summary.
        #[max_length = 255]
        title -> Varchar,
        /// Free-text detail.
        description -> Nullable<Text>,
        /// Item type name.
        #[max_length = 64]
        item_type -> Varchar,
        /// Priority name.
        #[max_length = 16]
        priority -> Varchar,
        /// Workflow status.
        #[max_length = 16]
        status -> Varchar,
        /// Due date.
        due_date -> Nullable<Date>,
        /// Estimate in hundredths of an hour.
        hours_estimated -> Int8,
        /// Logged time in hundredths of an hour.
        hours_spent -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Projects mirrored from the organisation directory.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Customer company owning the project, if any.
        customer_company_id -> Nullable<Uuid>,
        /// Project manager, if any.
        manager_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Teams working on a project.
    project_teams (project_id, team_id) {
        /// Project identifier.
        project_id -> Uuid,
        /// Team identifier.
        team_id -> Uuid,
    }
}

diesel::table! {
    /// Internal teams.
    teams (id) {
        /// Team identifier.
        id -> Uuid,
        /// Team lead, if any.
        lead_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Team membership.
    team_members (team_id, person_id) {
        /// Team identifier.
        team_id -> Uuid,
        /// Member identifier.
        person_id -> Uuid,
    }
}

diesel::table! {
    /// Customer company staff.
    customer_staff (company_id, person_id) {
        /// Company identifier.
        company_id -> Uuid,
        /// Staff member identifier.
        person_id -> Uuid,
    }
}
