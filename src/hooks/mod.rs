//! Save-time hooks. The only one today runs after a property project is
//! saved: keeping developer and mandate child lists in step with the
//! projects that reference them.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::crm::PropertyProject;

/// Child row to append to a developer's or mandate's project list
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLinkRow {
    pub project: Uuid,
    pub project_name: String,
    pub start_date: NaiveDate,
    pub status: &'static str,
}

/// Decide whether a saved project needs a new child row given the project
/// ids already in the list. Returns `None` when the link exists, which is
/// what makes repeated saves idempotent.
pub fn project_link_row(
    project: &PropertyProject,
    existing: &[Uuid],
    today: NaiveDate,
) -> Option<ProjectLinkRow> {
    if existing.contains(&project.id) {
        return None;
    }
    Some(ProjectLinkRow {
        project: project.id,
        project_name: project.project_name.clone(),
        start_date: today,
        status: "Active",
    })
}

/// After a project is saved, make sure it appears in the linked developer's
/// `projects_list` and the linked mandate's assigned projects. Sync failures
/// are logged and never fail the save itself.
pub async fn sync_project_links(pool: &PgPool, project: &PropertyProject) {
    if let Some(developer) = project.developer {
        if let Err(e) = add_to_developer_list(pool, project, developer).await {
            tracing::error!("Developer update error for project {}: {}", project.id, e);
        }
    }

    if let Some(mandate) = project.mandate {
        if let Err(e) = add_to_mandate_list(pool, project, mandate).await {
            tracing::error!("Mandate update error for project {}: {}", project.id, e);
        }
    }
}

async fn add_to_developer_list(
    pool: &PgPool,
    project: &PropertyProject,
    developer: Uuid,
) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_scalar::<_, Uuid>(
        "SELECT project FROM developer_project WHERE developer = $1",
    )
    .bind(developer)
    .fetch_all(pool)
    .await?;

    let Some(row) = project_link_row(project, &existing, Utc::now().date_naive()) else {
        return Ok(());
    };

    // The UNIQUE (developer, project) constraint backs this up under
    // concurrent saves
    sqlx::query(
        "INSERT INTO developer_project (developer, project, project_name, start_date, status) \
         VALUES ($1, $2, $3, $4, $5) ON CONFLICT (developer, project) DO NOTHING",
    )
    .bind(developer)
    .bind(row.project)
    .bind(&row.project_name)
    .bind(row.start_date)
    .bind(row.status)
    .execute(pool)
    .await?;

    tracing::info!("Project {} added to developer {} list", project.id, developer);
    Ok(())
}

async fn add_to_mandate_list(
    pool: &PgPool,
    project: &PropertyProject,
    mandate: Uuid,
) -> Result<(), sqlx::Error> {
    let existing =
        sqlx::query_scalar::<_, Uuid>("SELECT project FROM mandate_project WHERE mandate = $1")
            .bind(mandate)
            .fetch_all(pool)
            .await?;

    let Some(row) = project_link_row(project, &existing, Utc::now().date_naive()) else {
        return Ok(());
    };

    sqlx::query(
        "INSERT INTO mandate_project (mandate, project, project_name, start_date, status) \
         VALUES ($1, $2, $3, $4, $5) ON CONFLICT (mandate, project) DO NOTHING",
    )
    .bind(mandate)
    .bind(row.project)
    .bind(&row.project_name)
    .bind(row.start_date)
    .bind(row.status)
    .execute(pool)
    .await?;

    tracing::info!("Project {} added to mandate {}", project.id, mandate);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn project(id: Uuid) -> PropertyProject {
        let now: DateTime<Utc> = Utc::now();
        PropertyProject {
            id,
            project_name: "Sunrise Heights".to_string(),
            developer: Some(Uuid::new_v4()),
            mandate: None,
            location: None,
            project_type: None,
            status: "Active".to_string(),
            price_min: None,
            price_max: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn first_save_produces_a_link_row() {
        let p = project(Uuid::new_v4());
        let today = Utc::now().date_naive();

        let row = project_link_row(&p, &[], today).expect("new link");
        assert_eq!(row.project, p.id);
        assert_eq!(row.project_name, "Sunrise Heights");
        assert_eq!(row.start_date, today);
        assert_eq!(row.status, "Active");
    }

    #[test]
    fn second_save_adds_nothing() {
        let p = project(Uuid::new_v4());
        let today = Utc::now().date_naive();

        let first = project_link_row(&p, &[], today).expect("new link");
        // Simulate the state after the first save landed
        let existing = vec![first.project];
        assert_eq!(project_link_row(&p, &existing, today), None);
    }

    #[test]
    fn other_projects_in_the_list_do_not_block_the_link() {
        let p = project(Uuid::new_v4());
        let existing = vec![Uuid::new_v4(), Uuid::new_v4()];

        let row = project_link_row(&p, &existing, Utc::now().date_naive());
        assert!(row.is_some());
    }
}
