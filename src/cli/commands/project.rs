//! project command - Manage projects

use anyhow::{bail, Result};
use clap::{ArgMatches, Command};
use serde_json::Value;

use super::required;
use crate::api::{
    CreateProjectOptions, EditProjectOptions, ForkProjectOptions, GetProjectOptions, GitlabApi,
    ListForksOptions, ListProjectsOptions, ProjectRef, ShareWithGroupOptions,
    UnshareProjectOptions, UploadFileOptions,
};
use crate::core::types::Identifier;
use crate::flag_declaration;
use crate::flags::{flag, FlagError, FlagMapper, ACCESS_LEVEL, ISO_DATE};

flag_declaration! {
    /// Flags of `project ls`.
    pub struct ListFlags {
        archived: Boolean = flag("archived").help("Limit by archived status"),
        visibility: Text = flag("visibility")
            .help("Limit by visibility public, internal, or private"),
        order_by: Text = flag("order_by").help(
            "Return projects ordered by id, name, path, created_at, updated_at, or last_activity_at fields",
        ),
        sort: Text = flag("sort").help("Return projects sorted in asc or desc order"),
        search: Text = flag("search").help("Return list of projects matching the search criteria"),
        simple: Boolean = flag("simple").help("Return only the ID, URL, name, and path of each project"),
        owned: Boolean = flag("owned").help("Limit by projects owned by the current user"),
        membership: Boolean = flag("membership")
            .help("Limit by projects that the current user is a member of"),
        starred: Boolean = flag("starred").help("Limit by projects starred by the current user"),
        statistics: Boolean = flag("statistics").help("Include project statistics"),
        with_issues_enabled: Boolean = flag("with_issues_enabled")
            .help("Limit by enabled issues feature"),
        with_merge_requests_enabled: Boolean = flag("with_merge_requests_enabled")
            .help("Limit by enabled merge requests feature"),
    }
}

flag_declaration! {
    /// Flags of `project get`.
    pub struct GetFlags {
        id: Text = flag("id")
            .short('i')
            .required()
            .help("Either the project ID (numeric) or 'namespace/project-name'"),
        statistics: Boolean = flag("statistics").short('s').help("Include project statistics"),
    }
}

flag_declaration! {
    /// Flags of `project create`.
    pub struct CreateFlags {
        name: Text = flag("name").required().help("The name of the new project"),
        path: Text = flag("path")
            .help("Custom repository name for new project. By default generated based on name"),
        default_branch: Text = flag("default_branch").help("master by default"),
        namespace_id: Integer = flag("namespace_id")
            .help("Namespace ID (Group ID) for the new project, defaults to the current user's namespace"),
        description: Text = flag("description").help("Short project description"),
        issues_enabled: Boolean = flag("issues_enabled").help("Enable issues for this project"),
        merge_requests_enabled: Boolean = flag("merge_requests_enabled")
            .help("Enable merge requests for this project"),
        jobs_enabled: Boolean = flag("jobs_enabled").help("Enable jobs for this project"),
        wiki_enabled: Boolean = flag("wiki_enabled").help("Enable wiki for this project"),
        snippets_enabled: Boolean = flag("snippets_enabled").help("Enable snippets for this project"),
        resolve_outdated_diff_discussions: Boolean = flag("resolve_outdated_diff_discussions")
            .help("Automatically resolve merge request diff discussions on lines changed with a push"),
        container_registry_enabled: Boolean = flag("container_registry_enabled")
            .help("Enable container registry for this project"),
        shared_runners_enabled: Boolean = flag("shared_runners_enabled")
            .help("Enable shared runners for this project"),
        visibility: Text = flag("visibility").help("private, internal or public"),
        import_url: Text = flag("import_url").help("URL to import repository from"),
        public_jobs: Boolean = flag("public_jobs")
            .help("If true, jobs can be viewed by non-project-members"),
        only_allow_merge_if_pipeline_succeeds: Boolean = flag("only_allow_merge_if_pipeline_succeeds")
            .help("Merge requests can only be merged with successful jobs"),
        only_allow_merge_if_all_discussions_are_resolved: Boolean =
            flag("only_allow_merge_if_all_discussions_are_resolved")
                .help("Merge requests can only be merged when all the discussions are resolved"),
        lfs_enabled: Boolean = flag("lfs_enabled").help("Enable LFS"),
        request_access_enabled: Boolean = flag("request_access_enabled")
            .help("Allow users to request member access"),
        tag_list: TextList = flag("tag_list").help("Tags to assign to the project"),
        avatar: Binary = flag("avatar").help("Image file for avatar of the project"),
        printing_merge_request_link_enabled: Boolean = flag("printing_merge_request_link_enabled")
            .help("Show link to create/view merge request when pushing from the command line"),
        ci_config_path: Text = flag("ci_config_path").help("The path to CI config file"),
    }
}

flag_declaration! {
    /// Flags of `project edit`.
    pub struct EditFlags {
        id: Text = flag("id")
            .short('i')
            .required()
            .help("The ID or URL-encoded path of the project"),
        name: Text = flag("name").required().help("The name of the project"),
        path: Text = flag("path").help("Custom repository name for the project"),
        default_branch: Text = flag("default_branch").help("master by default"),
        description: Text = flag("description").help("Short project description"),
        issues_enabled: Boolean = flag("issues_enabled").help("Enable issues for this project"),
        merge_requests_enabled: Boolean = flag("merge_requests_enabled")
            .help("Enable merge requests for this project"),
        jobs_enabled: Boolean = flag("jobs_enabled").help("Enable jobs for this project"),
        wiki_enabled: Boolean = flag("wiki_enabled").help("Enable wiki for this project"),
        snippets_enabled: Boolean = flag("snippets_enabled").help("Enable snippets for this project"),
        resolve_outdated_diff_discussions: Boolean = flag("resolve_outdated_diff_discussions")
            .help("Automatically resolve merge request diff discussions on lines changed with a push"),
        container_registry_enabled: Boolean = flag("container_registry_enabled")
            .help("Enable container registry for this project"),
        shared_runners_enabled: Boolean = flag("shared_runners_enabled")
            .help("Enable shared runners for this project"),
        visibility: Text = flag("visibility").help("private, internal or public"),
        import_url: Text = flag("import_url").help("URL to import repository from"),
        public_jobs: Boolean = flag("public_jobs")
            .help("If true, jobs can be viewed by non-project-members"),
        only_allow_merge_if_pipeline_succeeds: Boolean = flag("only_allow_merge_if_pipeline_succeeds")
            .help("Merge requests can only be merged with successful jobs"),
        only_allow_merge_if_all_discussions_are_resolved: Boolean =
            flag("only_allow_merge_if_all_discussions_are_resolved")
                .help("Merge requests can only be merged when all the discussions are resolved"),
        lfs_enabled: Boolean = flag("lfs_enabled").help("Enable LFS"),
        request_access_enabled: Boolean = flag("request_access_enabled")
            .help("Allow users to request member access"),
        tag_list: TextList = flag("tag_list").help("Tags to assign to the project"),
        ci_config_path: Text = flag("ci_config_path").help("The path to CI config file"),
    }
}

flag_declaration! {
    /// Flags of `project fork`.
    pub struct ForkFlags {
        id: Text = flag("id").required().help("The ID or URL-encoded path of the project"),
        namespace: Text = flag("namespace")
            .required()
            .help("The ID or path of the namespace that the project will be forked to"),
    }
}

flag_declaration! {
    /// Flags of `project share`.
    pub struct ShareFlags {
        id: Text = flag("id")
            .short('i')
            .required()
            .help("The ID or URL-encoded path of the project"),
        group_id: Integer = flag("group_id")
            .short('g')
            .required()
            .help("The ID of the group to share with"),
        group_access: Text = flag("group_access")
            .short('a')
            .required()
            .transform(ACCESS_LEVEL)
            .help("The permissions level to grant the group: guest, reporter, developer, maintainer or owner"),
        expires_at: Text = flag("expires_at")
            .short('e')
            .transform(ISO_DATE)
            .help("Share expiration date in ISO 8601 format: 2016-09-26"),
    }
}

flag_declaration! {
    /// Flags of `project unshare`.
    pub struct UnshareFlags {
        id: Text = flag("id")
            .short('i')
            .required()
            .help("The ID or URL-encoded path of the project"),
        group_id: Integer = flag("group_id")
            .short('g')
            .required()
            .help("The ID of the group"),
    }
}

flag_declaration! {
    /// Flags of `project list-forks`.
    pub struct ListForksFlags {
        id: Text = flag("id")
            .short('i')
            .required()
            .help("The ID or URL-encoded path of the project"),
        archived: Boolean = flag("archived").help("Limit by archived status"),
        visibility: Text = flag("visibility")
            .help("Limit by visibility public, internal, or private"),
        order_by: Text = flag("order_by").help(
            "Return projects ordered by id, name, path, created_at, updated_at, or last_activity_at fields. Default is created_at",
        ),
        sort: Text = flag("sort").help("Return projects sorted in asc or desc order. Default is desc"),
        search: Text = flag("search").help("Return list of projects matching the search criteria"),
        simple: Boolean = flag("simple").help("Return only the ID, URL, name, and path of each project"),
        owned: Boolean = flag("owned").help("Limit by projects owned by the current user"),
        membership: Boolean = flag("membership")
            .help("Limit by projects that the current user is a member of"),
        starred: Boolean = flag("starred").help("Limit by projects starred by the current user"),
        statistics: Boolean = flag("statistics").help("Include project statistics"),
        with_issues_enabled: Boolean = flag("with_issues_enabled")
            .help("Limit by enabled issues feature"),
        with_merge_requests_enabled: Boolean = flag("with_merge_requests_enabled")
            .help("Limit by enabled merge requests feature"),
    }
}

flag_declaration! {
    /// Flags of `project upload-file`.
    pub struct UploadFileFlags {
        id: Text = flag("id")
            .short('i')
            .required()
            .help("The ID or URL-encoded path of the project"),
        file: Binary = flag("file")
            .short('f')
            .required()
            .help("Path to the file to be uploaded"),
    }
}

flag_declaration! {
    /// Flags of the project commands that take nothing but a project.
    pub struct ProjectIdFlags {
        id: Text = flag("id")
            .short('i')
            .required()
            .help("The ID or URL-encoded path of the project"),
    }
}

/// Parameterless project actions.
const ACTIONS: [(&str, &str); 5] = [
    ("star", "Star a project"),
    ("unstar", "Unstar a project"),
    ("archive", "Archive a project"),
    ("unarchive", "Unarchive a project"),
    ("delete", "Remove a project including all associated resources"),
];

/// The `project` command group with its flag mappers.
#[derive(Debug)]
pub struct ProjectCommands {
    list: FlagMapper<ListFlags, ListProjectsOptions>,
    get: FlagMapper<GetFlags, GetProjectOptions>,
    create: FlagMapper<CreateFlags, CreateProjectOptions>,
    edit: FlagMapper<EditFlags, EditProjectOptions>,
    fork: FlagMapper<ForkFlags, ForkProjectOptions>,
    share: FlagMapper<ShareFlags, ShareWithGroupOptions>,
    unshare: FlagMapper<UnshareFlags, UnshareProjectOptions>,
    forks: FlagMapper<ListForksFlags, ListForksOptions>,
    upload: FlagMapper<UploadFileFlags, UploadFileOptions>,
    action: FlagMapper<ProjectIdFlags, ProjectRef>,
}

impl ProjectCommands {
    pub fn new() -> Result<Self, FlagError> {
        Ok(Self {
            list: FlagMapper::new()?,
            get: FlagMapper::new()?,
            create: FlagMapper::new()?,
            edit: FlagMapper::new()?,
            fork: FlagMapper::new()?,
            share: FlagMapper::new()?,
            unshare: FlagMapper::new()?,
            forks: FlagMapper::new()?,
            upload: FlagMapper::new()?,
            action: FlagMapper::new()?,
        })
    }

    /// Build the `project` command tree.
    pub fn command(&self) -> Result<Command, FlagError> {
        let mut project = Command::new("project")
            .about("Manage projects")
            .long_about("List, create, edit and delete projects")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(
                self.list.register(
                    Command::new("ls")
                        .about("List all projects")
                        .long_about("Get a list of all visible projects for the authenticated user"),
                )?,
            )
            .subcommand(self.get.register(
                Command::new("get").about("Get detailed information for a project"),
            )?)
            .subcommand(
                self.create
                    .register(Command::new("create").about("Create a new project"))?,
            )
            .subcommand(
                self.edit
                    .register(Command::new("edit").about("Update an existing project"))?,
            )
            .subcommand(self.fork.register(Command::new("fork").about("Fork a project").long_about(
                "Forks a project into the given namespace. Forking completes in a background job; \
                 query the import_status of the new project to see when it is done.",
            ))?)
            .subcommand(
                self.share
                    .register(Command::new("share").about("Share a project with a group"))?,
            )
            .subcommand(self.unshare.register(
                Command::new("unshare").about("Delete a shared project link within a group"),
            )?)
            .subcommand(self.forks.register(
                Command::new("list-forks").about("List forks of a project").long_about(
                    "List the projects accessible to the calling user that have an established, \
                     forked relationship with the specified project",
                ),
            )?)
            .subcommand(self.upload.register(
                Command::new("upload-file").about("Upload a file").long_about(
                    "Uploads a file to the specified project to be used in an issue or merge \
                     request description, or a comment",
                ),
            )?);

        for (name, about) in ACTIONS {
            project = project.subcommand(self.action.register(Command::new(name).about(about))?);
        }

        Ok(project)
    }

    /// Run the selected `project` subcommand.
    pub async fn run(&self, matches: &ArgMatches, api: &dyn GitlabApi) -> Result<Value> {
        let Some((name, sub)) = matches.subcommand() else {
            bail!("missing project subcommand");
        };

        let response = match name {
            "ls" => {
                let options = self.list.bind_matches(sub)?;
                api.list_projects(&options).await?
            }
            "get" => {
                let options = self.get.bind_matches(sub)?;
                api.get_project(&project_id(&options.id)?, &options).await?
            }
            "create" => {
                let options = self.create.bind_matches(sub)?;
                api.create_project(&options).await?
            }
            "edit" => {
                let options = self.edit.bind_matches(sub)?;
                api.edit_project(&project_id(&options.id)?, &options).await?
            }
            "fork" => {
                let options = self.fork.bind_matches(sub)?;
                api.fork_project(&project_id(&options.id)?, &options).await?
            }
            "share" => {
                let options = self.share.bind_matches(sub)?;
                api.share_project(&project_id(&options.id)?, &options).await?
            }
            "unshare" => {
                let options = self.unshare.bind_matches(sub)?;
                let group_id = required(&options.group_id, "group_id")?;
                api.unshare_project(&project_id(&options.id)?, group_id)
                    .await?
            }
            "list-forks" => {
                let options = self.forks.bind_matches(sub)?;
                api.list_forks(&project_id(&options.id)?, &options).await?
            }
            "upload-file" => {
                let options = self.upload.bind_matches(sub)?;
                api.upload_file(&project_id(&options.id)?, &options).await?
            }
            action => {
                let id = project_id(&self.action.bind_matches(sub)?.id)?;
                match action {
                    "star" => api.star_project(&id).await?,
                    "unstar" => api.unstar_project(&id).await?,
                    "archive" => api.archive_project(&id).await?,
                    "unarchive" => api.unarchive_project(&id).await?,
                    "delete" => api.delete_project(&id).await?,
                    other => bail!("unknown project subcommand '{}'", other),
                }
            }
        };

        Ok(response)
    }
}

/// The bound project identifier.
fn project_id(id: &Option<Identifier>) -> Result<Identifier, FlagError> {
    required(id, "id")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockGitlab;
    use crate::api::{Method, Operation};

    fn run_with(api: &MockGitlab, args: &[&str]) -> Result<Value> {
        let commands = ProjectCommands::new()?;
        let matches = commands.command()?.try_get_matches_from(args)?;
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(commands.run(&matches, api))
    }

    #[test]
    fn command_tree_is_consistent() {
        ProjectCommands::new().unwrap().command().unwrap().debug_assert();
    }

    #[test]
    fn every_declared_project_flag_is_forwarded() {
        let commands = ProjectCommands::new().unwrap();
        assert!(commands.list.unmapped_flags().is_empty());
        assert!(commands.create.unmapped_flags().is_empty());
        assert!(commands.edit.unmapped_flags().is_empty());
        assert!(commands.share.unmapped_flags().is_empty());
        assert!(commands.forks.unmapped_flags().is_empty());
    }

    #[test]
    fn share_binds_transformed_values() {
        let api = MockGitlab::new();
        run_with(
            &api,
            &[
                "project",
                "share",
                "-i",
                "10",
                "-g",
                "3",
                "-a",
                "Developer",
                "-e",
                "2030-01-31",
            ],
        )
        .unwrap();

        let request = api.last_operation().unwrap();
        assert_eq!(request.operation, Operation::ShareProject);
        assert_eq!(request.path, "/projects/10/share");
        assert_eq!(request.params["group_access"], 30);
        assert_eq!(request.params["group_id"], 3);
        assert_eq!(request.params["expires_at"], "2030-01-31");
    }

    #[test]
    fn get_accepts_namespace_paths() {
        let api = MockGitlab::new();
        run_with(&api, &["project", "get", "--id", "group/project", "-s"]).unwrap();

        let request = api.last_operation().unwrap();
        assert_eq!(request.path, "/projects/group%2Fproject");
        assert_eq!(request.params["statistics"], true);
    }

    #[test]
    fn create_without_name_fails_before_calling_api() {
        let api = MockGitlab::new();
        let err = run_with(&api, &["project", "create", "--description", "x"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FlagError>(),
            Some(FlagError::MissingRequiredFlag { name: "name" })
        ));
        assert!(api.operations().is_empty());
    }

    #[test]
    fn create_forwards_lists_and_files() {
        let api = MockGitlab::new();
        run_with(
            &api,
            &[
                "project",
                "create",
                "--name",
                "demo",
                "--namespace_id",
                "12",
                "--tag_list",
                "rust,cli",
                "--avatar",
                "logo.png",
                "--wiki_enabled=false",
            ],
        )
        .unwrap();

        let request = api.last_operation().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.params["tag_list"], serde_json::json!(["rust", "cli"]));
        assert_eq!(request.params["avatar"], "logo.png");
        assert_eq!(request.params["namespace_id"], 12);
        assert_eq!(request.params["wiki_enabled"], false);
        assert!(request.params.get("description").is_none());
    }

    #[test]
    fn actions_target_the_project() {
        let api = MockGitlab::new();
        for action in ["star", "unstar", "archive", "unarchive", "delete"] {
            run_with(&api, &["project", action, "-i", "7"]).unwrap();
        }
        let operations: Vec<Operation> = api.operations().iter().map(|r| r.operation).collect();
        assert_eq!(
            operations,
            vec![
                Operation::StarProject,
                Operation::UnstarProject,
                Operation::ArchiveProject,
                Operation::UnarchiveProject,
                Operation::DeleteProject,
            ]
        );
    }

    #[test]
    fn fork_namespace_is_disambiguated() {
        let api = MockGitlab::new();
        run_with(&api, &["project", "fork", "--id", "a/b", "--namespace", "42"]).unwrap();
        let request = api.last_operation().unwrap();
        assert_eq!(request.path, "/projects/a%2Fb/fork");
        assert_eq!(request.params["namespace"], 42);
    }

    #[test]
    fn unknown_access_level_is_reported() {
        let api = MockGitlab::new();
        let err = run_with(
            &api,
            &["project", "share", "-i", "1", "-g", "2", "-a", "admin"],
        )
        .unwrap_err();
        assert!(err.to_string().contains("group_access"));
        assert!(api.operations().is_empty());
    }

    #[test]
    fn unshare_addresses_the_group_link() {
        let api = MockGitlab::new();
        run_with(&api, &["project", "unshare", "-i", "group/project", "-g", "8"]).unwrap();

        let request = api.last_operation().unwrap();
        assert_eq!(request.operation, Operation::UnshareProject);
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.path, "/projects/group%2Fproject/share/8");
    }

    #[test]
    fn list_forks_keeps_project_out_of_query() {
        let api = MockGitlab::new();
        run_with(
            &api,
            &["project", "list-forks", "-i", "3", "--owned", "--sort", "asc"],
        )
        .unwrap();

        let request = api.last_operation().unwrap();
        assert_eq!(request.path, "/projects/3/forks");
        assert_eq!(
            serde_json::Value::Object(request.params),
            serde_json::json!({"owned": true, "sort": "asc"})
        );
    }

    #[test]
    fn upload_file_requires_a_file() {
        let api = MockGitlab::new();
        let err = run_with(&api, &["project", "upload-file", "-i", "3"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FlagError>(),
            Some(FlagError::MissingRequiredFlag { name: "file" })
        ));

        run_with(&api, &["project", "upload-file", "-i", "3", "-f", "notes.md"]).unwrap();
        let request = api.last_operation().unwrap();
        assert_eq!(request.operation, Operation::UploadFile);
        assert_eq!(request.path, "/projects/3/uploads");
        assert_eq!(request.params["file"], "notes.md");
    }
}
