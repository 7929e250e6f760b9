//! Docker invocations for a project's database environment.
//!
//! Every name is derived from the project name, so provisioning the same
//! project twice targets the same network and containers.

use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::config::ContainerConfig;

/// Port Postgres listens on inside its container.
pub const POSTGRES_CONTAINER_PORT: u16 = 5432;

/// Port pgAdmin listens on inside its container.
pub const PGADMIN_CONTAINER_PORT: u16 = 80;

/// Where pgAdmin reads its server definitions.
pub const PGADMIN_SERVERS_PATH: &str = "/pgadmin4/servers.json";

/// Where pgAdmin reads the password for the predefined server.
pub const PGPASS_PATH: &str = "/var/lib/pgadmin/pgpassfile";

/// Host ports chosen for the two containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPorts {
    /// Host port mapped to Postgres
    pub postgres: u16,
    /// Host port mapped to pgAdmin
    pub pgadmin: u16,
}

/// Every name, credential and port needed to start one project's
/// containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerPlan {
    /// Docker network shared by both containers
    pub network: String,
    /// Postgres container name (also its host name on the network)
    pub postgres_container: String,
    /// pgAdmin container name
    pub pgadmin_container: String,
    /// Database created at startup
    pub database: String,
    /// Database user
    pub user: String,
    /// Password for the database user and pgAdmin login
    pub password: String,
    /// pgAdmin login email
    pub pgadmin_email: String,
    /// Postgres image
    pub postgres_image: String,
    /// pgAdmin image
    pub pgadmin_image: String,
    /// Host port mappings
    pub ports: HostPorts,
}

/// What a caller needs to connect once provisioning finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionDetails {
    /// Host to connect to from the host machine
    pub host: String,
    /// Host port mapped to Postgres
    pub port: u16,
    /// Database name
    pub database: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// pgAdmin web UI
    pub pgadmin_url: String,
}

impl ContainerPlan {
    /// Plan the containers for `project`.
    pub fn for_project(project: &str, config: &ContainerConfig, ports: HostPorts) -> Self {
        Self {
            network: format!("{project}-network"),
            postgres_container: format!("{project}-postgres"),
            pgadmin_container: format!("{project}-pgadmin"),
            database: project.to_string(),
            user: format!("{project}-db-user"),
            password: config.password.clone(),
            pgadmin_email: config.pgadmin_email.clone(),
            postgres_image: config.postgres_image.clone(),
            pgadmin_image: config.pgadmin_image.clone(),
            ports,
        }
    }

    /// `docker network create`
    pub fn network_args(&self) -> Vec<String> {
        args(["network", "create", &self.network])
    }

    /// `docker run` for Postgres.
    pub fn postgres_args(&self) -> Vec<String> {
        args([
            "run",
            "-d",
            "--name",
            &self.postgres_container,
            "-e",
            &format!("POSTGRES_DB={}", self.database),
            "-e",
            &format!("POSTGRES_USER={}", self.user),
            "-e",
            &format!("POSTGRES_PASSWORD={}", self.password),
            "--network",
            &self.network,
            "-p",
            &format!("{}:{POSTGRES_CONTAINER_PORT}", self.ports.postgres),
            &self.postgres_image,
        ])
    }

    /// `docker run` for pgAdmin with `servers_file` mounted as its server
    /// list.
    pub fn pgadmin_args(&self, servers_file: &Path) -> Vec<String> {
        args([
            "run",
            "-d",
            "--name",
            &self.pgadmin_container,
            "-p",
            &format!("{}:{PGADMIN_CONTAINER_PORT}", self.ports.pgadmin),
            "-e",
            &format!("PGADMIN_DEFAULT_EMAIL={}", self.pgadmin_email),
            "-e",
            &format!("PGADMIN_DEFAULT_PASSWORD={}", self.password),
            "--network",
            &self.network,
            "-v",
            &format!("{}:{PGADMIN_SERVERS_PATH}", servers_file.display()),
            &self.pgadmin_image,
        ])
    }

    /// `docker inspect` printing a container's state.
    pub fn inspect_args(container: &str) -> Vec<String> {
        args(["inspect", "--format", "{{.State.Status}}", container])
    }

    /// `docker exec` writing the pgpass file inside the pgAdmin container.
    pub fn pgpass_args(&self) -> Vec<String> {
        let line = self.pgpass_line().replace('\'', r"'\''");
        args([
            "exec",
            "-i",
            &self.pgadmin_container,
            "sh",
            "-c",
            &format!("echo '{line}' > {PGPASS_PATH}"),
        ])
    }

    /// `host:port:database:user:password` as seen from inside the network.
    pub fn pgpass_line(&self) -> String {
        format!(
            "{}:{POSTGRES_CONTAINER_PORT}:{}:{}:{}",
            self.postgres_container, self.database, self.user, self.password
        )
    }

    /// pgAdmin server definition pointing at the Postgres container.
    pub fn servers_json(&self) -> serde_json::Value {
        json!({
            "Servers": {
                "1": {
                    "Name": "PostgreSQL",
                    "Group": "Servers",
                    "Host": self.postgres_container,
                    "Port": POSTGRES_CONTAINER_PORT,
                    "MaintenanceDB": self.database,
                    "Username": self.user,
                    "SSLMode": "prefer",
                    "PassFile": PGPASS_PATH,
                }
            }
        })
    }

    /// Connection details for the host machine.
    pub fn connection_details(&self) -> ConnectionDetails {
        ConnectionDetails {
            host: "localhost".to_string(),
            port: self.ports.postgres,
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            pgadmin_url: format!("http://localhost:{}", self.ports.pgadmin),
        }
    }
}

fn args<const N: usize>(list: [&str; N]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> ContainerPlan {
        ContainerPlan::for_project(
            "demo",
            &ContainerConfig::default(),
            HostPorts {
                postgres: 5433,
                pgadmin: 5051,
            },
        )
    }

    #[test]
    fn names_derive_from_project() {
        let plan = plan();

        assert_eq!(plan.network, "demo-network");
        assert_eq!(plan.postgres_container, "demo-postgres");
        assert_eq!(plan.pgadmin_container, "demo-pgadmin");
        assert_eq!(plan.database, "demo");
        assert_eq!(plan.user, "demo-db-user");
    }

    #[test]
    fn postgres_run_maps_host_port() {
        let args = plan().postgres_args();

        assert_eq!(&args[..4], ["run", "-d", "--name", "demo-postgres"]);
        assert!(args.contains(&"POSTGRES_USER=demo-db-user".to_string()));
        assert!(args.contains(&"5433:5432".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("postgres:latest"));
    }

    #[test]
    fn pgadmin_run_mounts_servers_file() {
        let args = plan().pgadmin_args(Path::new("/work/.blitz/servers.json"));

        assert!(args.contains(&"5051:80".to_string()));
        assert!(args.contains(&"/work/.blitz/servers.json:/pgadmin4/servers.json".to_string()));
        assert!(args.contains(&"demo-network".to_string()));
    }

    #[test]
    fn servers_json_points_at_postgres_container() {
        let value = plan().servers_json();
        let server = &value["Servers"]["1"];

        assert_eq!(server["Host"], "demo-postgres");
        assert_eq!(server["Port"], 5432);
        assert_eq!(server["Username"], "demo-db-user");
        assert_eq!(server["PassFile"], PGPASS_PATH);
    }

    #[test]
    fn pgpass_escapes_single_quotes() {
        let mut plan = plan();
        plan.password = "it's".to_string();

        let args = plan.pgpass_args();

        assert_eq!(
            args.last().unwrap(),
            r"echo 'demo-postgres:5432:demo:demo-db-user:it'\''s' > /var/lib/pgadmin/pgpassfile"
        );
    }

    #[test]
    fn connection_details_use_host_ports() {
        let details = plan().connection_details();

        assert_eq!(details.port, 5433);
        assert_eq!(details.pgadmin_url, "http://localhost:5051");
    }
}
