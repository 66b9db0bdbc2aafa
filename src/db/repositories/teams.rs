use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::MemberRole;
use crate::db::models::team::{
    MemberRemovalError, NewTeam, NewTeamMember, Team, TeamMember, TeamRow,
};
use crate::db::repositories::{MemberRemoval, PgStore, TeamRepository};
use crate::db::{StoreError, StoreResult};
use crate::schema::{team_members, teams};

#[derive(Insertable)]
#[diesel(table_name = crate::schema::team_members)]
struct NewTeamMemberRow<'a> {
    team_id: Uuid,
    user_id: Option<Uuid>,
    role: MemberRole,
    invited_email: &'a str,
}

impl<'a> NewTeamMemberRow<'a> {
    fn new(team_id: Uuid, member: &'a NewTeamMember) -> Self {
        Self {
            team_id,
            user_id: member.user_id,
            role: member.role,
            invited_email: &member.invited_email,
        }
    }
}

fn load_members(conn: &mut PgConnection, team_id: Uuid) -> QueryResult<Vec<TeamMember>> {
    team_members::table
        .filter(team_members::team_id.eq(team_id))
        .order((team_members::joined_at.asc(), team_members::id.asc()))
        .select(TeamMember::as_select())
        .load(conn)
}

fn load_team(conn: &mut PgConnection, team_id: Uuid) -> QueryResult<Option<Team>> {
    let row = teams::table
        .find(team_id)
        .select(TeamRow::as_select())
        .first(conn)
        .optional()?;
    match row {
        Some(row) => {
            let members = load_members(conn, team_id)?;
            Ok(Some(row.with_members(members)))
        }
        None => Ok(None),
    }
}

impl TeamRepository for PgStore {
    fn insert_team(&self, name: &str, owner: &NewTeamMember) -> StoreResult<Team> {
        let mut conn = self.conn()?;
        conn.transaction::<Team, StoreError, _>(|conn| {
            let row: TeamRow = diesel::insert_into(teams::table)
                .values(&NewTeam {
                    name: name.to_string(),
                })
                .returning(TeamRow::as_returning())
                .get_result(conn)?;

            let member: TeamMember = diesel::insert_into(team_members::table)
                .values(&NewTeamMemberRow::new(row.id, owner))
                .returning(TeamMember::as_returning())
                .get_result(conn)?;

            Ok(row.with_members(vec![member]))
        })
    }

    fn find_team(&self, team_id: Uuid) -> StoreResult<Option<Team>> {
        let mut conn = self.conn()?;
        Ok(load_team(&mut conn, team_id)?)
    }

    fn rename_team(&self, team_id: Uuid, name: &str) -> StoreResult<Option<Team>> {
        let mut conn = self.conn()?;
        let updated = diesel::update(teams::table.find(team_id))
            .set((teams::name.eq(name), teams::updated_at.eq(Utc::now())))
            .execute(&mut conn)?;
        if updated == 0 {
            return Ok(None);
        }
        Ok(load_team(&mut conn, team_id)?)
    }

    fn teams_for_user(&self, user_id: Uuid, email: &str) -> StoreResult<Vec<Team>> {
        let mut conn = self.conn()?;

        let member_of = team_members::table
            .filter(
                team_members::user_id
                    .eq(user_id)
                    .or(team_members::invited_email.eq(email)),
            )
            .select(team_members::team_id);

        let rows: Vec<TeamRow> = teams::table
            .filter(teams::id.eq_any(member_of))
            .order((teams::created_at.desc(), teams::id.asc()))
            .select(TeamRow::as_select())
            .load(&mut conn)?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let members: Vec<(Uuid, TeamMember)> = team_members::table
            .filter(team_members::team_id.eq_any(&ids))
            .order((team_members::joined_at.asc(), team_members::id.asc()))
            .select((team_members::team_id, TeamMember::as_select()))
            .load(&mut conn)?;

        let mut by_team: HashMap<Uuid, Vec<TeamMember>> = HashMap::new();
        for (team_id, member) in members {
            by_team.entry(team_id).or_default().push(member);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let members = by_team.remove(&row.id).unwrap_or_default();
                row.with_members(members)
            })
            .collect())
    }

    fn push_member(&self, team_id: Uuid, member: &NewTeamMember) -> StoreResult<Option<Team>> {
        let mut conn = self.conn()?;
        conn.transaction::<Option<Team>, StoreError, _>(|conn| {
            let exists = teams::table
                .find(team_id)
                .select(teams::id)
                .for_update()
                .first::<Uuid>(conn)
                .optional()?;
            if exists.is_none() {
                return Ok(None);
            }

            // unique (team_id, invited_email) surfaces as StoreError::Duplicate
            diesel::insert_into(team_members::table)
                .values(&NewTeamMemberRow::new(team_id, member))
                .execute(conn)?;

            diesel::update(teams::table.find(team_id))
                .set(teams::updated_at.eq(Utc::now()))
                .execute(conn)?;

            Ok(load_team(conn, team_id)?)
        })
    }

    fn remove_member(&self, team_id: Uuid, member_id: Uuid) -> StoreResult<MemberRemoval> {
        let mut conn = self.conn()?;
        conn.transaction::<MemberRemoval, StoreError, _>(|conn| {
            // 锁住团队行，串行化同一团队的成员变更
            let row = teams::table
                .find(team_id)
                .select(TeamRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;
            let Some(row) = row else {
                return Ok(MemberRemoval::TeamNotFound);
            };

            let team = row.with_members(load_members(conn, team_id)?);
            match team.check_removal(member_id) {
                Err(MemberRemovalError::MemberNotFound) => {
                    return Ok(MemberRemoval::MemberNotFound);
                }
                Err(MemberRemovalError::LastOwner) => return Ok(MemberRemoval::LastOwner),
                Ok(()) => {}
            }

            diesel::delete(
                team_members::table
                    .filter(team_members::id.eq(member_id))
                    .filter(team_members::team_id.eq(team_id)),
            )
            .execute(conn)?;

            diesel::update(teams::table.find(team_id))
                .set(teams::updated_at.eq(Utc::now()))
                .execute(conn)?;

            match load_team(conn, team_id)? {
                Some(team) => Ok(MemberRemoval::Removed(team)),
                None => Ok(MemberRemoval::TeamNotFound),
            }
        })
    }

    fn link_pending_member(&self, team_id: Uuid, email: &str, user_id: Uuid) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        let linked = diesel::update(
            team_members::table
                .filter(team_members::team_id.eq(team_id))
                .filter(team_members::invited_email.eq(email))
                .filter(team_members::user_id.is_null()),
        )
        .set(team_members::user_id.eq(user_id))
        .execute(&mut conn)?;
        Ok(linked > 0)
    }

    fn link_pending_memberships(&self, email: &str, user_id: Uuid) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        let linked = diesel::update(
            team_members::table
                .filter(team_members::invited_email.eq(email))
                .filter(team_members::user_id.is_null()),
        )
        .set(team_members::user_id.eq(user_id))
        .execute(&mut conn)?;
        Ok(linked)
    }
}
