//! Initial database migration.
//!
//! Creates the leave ledger schema: enums, users, balances, the append-only
//! transaction ledger, approval requests with time-off details, and weekly
//! task entries.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & TIMESHEETS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(TASK_ENTRIES_SQL).await?;

        // ============================================================
        // PART 3: LEAVE LEDGER
        // ============================================================
        db.execute_unprepared(LEAVE_BALANCES_SQL).await?;
        db.execute_unprepared(LEAVE_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: APPROVALS
        // ============================================================
        db.execute_unprepared(APPROVAL_REQUESTS_SQL).await?;
        db.execute_unprepared(TIME_OFF_DETAILS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE leave_category AS ENUM ('SICK', 'VACATION');

CREATE TYPE leave_request_type AS ENUM (
    'SICK',
    'VACATION',
    'BEREAVEMENT',
    'UNPAID',
    'MILITARY',
    'JURY_DUTY',
    'PARENTAL',
    'OTHER'
);

CREATE TYPE leave_entry_kind AS ENUM ('ACCRUAL', 'USAGE', 'ADJUSTMENT');

CREATE TYPE approval_status AS ENUM ('PENDING', 'APPROVED', 'REJECTED', 'CANCELLED');

CREATE TYPE approval_request_type AS ENUM ('TIME_OFF');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    start_date DATE,
    initial_sick_leave_granted BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_start_date ON users(start_date) WHERE start_date IS NOT NULL;
";

const TASK_ENTRIES_SQL: &str = r"
CREATE TABLE task_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    project_name VARCHAR(255) NOT NULL,
    task_name VARCHAR(255) NOT NULL,
    week_start_date DATE NOT NULL,
    hours_mon NUMERIC(5, 2) NOT NULL DEFAULT 0 CHECK (hours_mon >= 0),
    hours_tue NUMERIC(5, 2) NOT NULL DEFAULT 0 CHECK (hours_tue >= 0),
    hours_wed NUMERIC(5, 2) NOT NULL DEFAULT 0 CHECK (hours_wed >= 0),
    hours_thu NUMERIC(5, 2) NOT NULL DEFAULT 0 CHECK (hours_thu >= 0),
    hours_fri NUMERIC(5, 2) NOT NULL DEFAULT 0 CHECK (hours_fri >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_task_entries_user_week ON task_entries(user_id, week_start_date);
";

const LEAVE_BALANCES_SQL: &str = r"
CREATE TABLE leave_balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id),
    category leave_category NOT NULL,
    balance NUMERIC(12, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_leave_balances_user_category UNIQUE (user_id, category)
);
";

const LEAVE_TRANSACTIONS_SQL: &str = r"
CREATE TABLE leave_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id),
    recorded_by UUID REFERENCES users(id),
    requested_type leave_request_type NOT NULL,
    category leave_category NOT NULL,
    kind leave_entry_kind NOT NULL,
    days NUMERIC(12, 4) NOT NULL,
    affects_balance BOOLEAN NOT NULL DEFAULT true,
    effective_date DATE NOT NULL,
    period_start DATE,
    period_end DATE,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_leave_transactions_days_nonzero CHECK (days <> 0),
    CONSTRAINT chk_leave_transactions_sign CHECK (
        (kind = 'ACCRUAL' AND days > 0)
        OR (kind = 'USAGE' AND days < 0)
        OR kind = 'ADJUSTMENT'
    ),
    CONSTRAINT chk_leave_transactions_period CHECK (
        period_start IS NULL OR period_end IS NULL OR period_end >= period_start
    )
);

CREATE INDEX idx_leave_transactions_user_effective
    ON leave_transactions(user_id, effective_date DESC, created_at DESC);
CREATE INDEX idx_leave_transactions_accrual_lookup
    ON leave_transactions(user_id, category, kind, effective_date);
";

const APPROVAL_REQUESTS_SQL: &str = r"
CREATE TABLE approval_requests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    request_type approval_request_type NOT NULL,
    status approval_status NOT NULL DEFAULT 'PENDING',
    requested_by UUID NOT NULL REFERENCES users(id),
    reviewed_by UUID REFERENCES users(id),
    requester_note TEXT,
    approver_note TEXT,
    submitted_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    decided_at TIMESTAMPTZ,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_approval_requests_decided CHECK (
        (status = 'PENDING' AND decided_at IS NULL)
        OR (status <> 'PENDING' AND decided_at IS NOT NULL)
    )
);

CREATE INDEX idx_approval_requests_status ON approval_requests(status, submitted_at DESC);
CREATE INDEX idx_approval_requests_requested_by ON approval_requests(requested_by, submitted_at DESC);
";

const TIME_OFF_DETAILS_SQL: &str = r"
CREATE TABLE time_off_details (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    approval_request_id UUID NOT NULL UNIQUE REFERENCES approval_requests(id) ON DELETE CASCADE,
    requested_type leave_request_type NOT NULL,
    category leave_category NOT NULL,
    period_start DATE NOT NULL,
    period_end DATE NOT NULL,
    total_days NUMERIC(12, 4) NOT NULL CHECK (total_days > 0),
    partial_start_days NUMERIC(12, 4),
    partial_end_days NUMERIC(12, 4),
    override_balance BOOLEAN NOT NULL DEFAULT false,

    CONSTRAINT chk_time_off_details_period CHECK (period_end >= period_start)
);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: prevent_leave_transaction_modification
-- Ledger rows are append-only
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_leave_transaction_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'leave_transactions is append-only; record an ADJUSTMENT instead.';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_leave_transactions_append_only
BEFORE UPDATE OR DELETE ON leave_transactions
FOR EACH ROW
EXECUTE FUNCTION prevent_leave_transaction_modification();

-- ============================================================
-- FUNCTION: prevent_decided_request_modification
-- A decided request never changes status again
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_decided_request_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.status <> 'PENDING' AND NEW.status <> OLD.status THEN
        RAISE EXCEPTION 'Cannot change status of a % request.', OLD.status;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_approval_requests_final
BEFORE UPDATE ON approval_requests
FOR EACH ROW
EXECUTE FUNCTION prevent_decided_request_modification();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TRIGGER IF EXISTS trg_approval_requests_final ON approval_requests;
DROP TRIGGER IF EXISTS trg_leave_transactions_append_only ON leave_transactions;
DROP FUNCTION IF EXISTS prevent_decided_request_modification();
DROP FUNCTION IF EXISTS prevent_leave_transaction_modification();

DROP TABLE IF EXISTS time_off_details CASCADE;
DROP TABLE IF EXISTS approval_requests CASCADE;
DROP TABLE IF EXISTS leave_transactions CASCADE;
DROP TABLE IF EXISTS leave_balances CASCADE;
DROP TABLE IF EXISTS task_entries CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS approval_request_type;
DROP TYPE IF EXISTS approval_status;
DROP TYPE IF EXISTS leave_entry_kind;
DROP TYPE IF EXISTS leave_request_type;
DROP TYPE IF EXISTS leave_category;
";
