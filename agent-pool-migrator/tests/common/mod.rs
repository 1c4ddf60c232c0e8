//! In-memory stand-ins for git and GitHub.

#![allow(dead_code)]

use agent_pool_migrator::{
    GitError, NewPullRequest, PullRequestRef, RepositoryClient, RepositoryId, ReviewClient,
    ReviewError, ORIGIN_REMOTE,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Files of one branch, keyed by repository-relative path.
pub type Tree = BTreeMap<PathBuf, String>;

/// A commit recorded by the fake.
#[derive(Debug, Clone)]
pub struct Commit {
    pub repository: String,
    pub branch: String,
    pub message: String,
    pub files: Tree,
}

/// A pull request recorded by the fake.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub repository: String,
    pub number: u64,
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

impl PullRequest {
    pub fn url(&self) -> String {
        format!("https://github.com/{}/pull/{}", self.repository, self.number)
    }
}

#[derive(Debug, Default)]
struct WorkingCopy {
    repository: String,
    remotes: HashMap<String, String>,
    head: Tree,
    branch: Option<String>,
    staged: Tree,
}

#[derive(Debug, Default)]
struct HostState {
    /// Upstream branches per repository full name.
    upstream: HashMap<String, HashMap<String, Tree>>,
    /// Branches pushed to each fork, keyed by fork full name.
    fork_branches: HashMap<String, HashSet<String>>,
    forks: HashSet<String>,
    fail_clone: HashSet<String>,
    /// Branch names whose push is rejected.
    fail_push: HashSet<String>,
    /// Base branches for which PR creation is rejected.
    fail_pull_request: HashSet<String>,
    clones: HashMap<PathBuf, WorkingCopy>,
    commits: Vec<Commit>,
    pushes: Vec<(String, String)>,
    pull_requests: Vec<PullRequest>,
    forks_created: Vec<String>,
}

/// A fake code host implementing both client traits.
#[derive(Debug)]
pub struct FakeHost {
    /// Account that owns forks created through the fake.
    user: String,
    state: Mutex<HostState>,
}

impl FakeHost {
    pub fn new(user: &str) -> Arc<Self> {
        Arc::new(Self {
            user: user.to_string(),
            state: Mutex::default(),
        })
    }

    /// Adds an upstream branch with the given files.
    pub fn add_branch(&self, repository: &str, branch: &str, files: &[(&str, &str)]) {
        let tree = files
            .iter()
            .map(|(path, content)| (PathBuf::from(path), content.to_string()))
            .collect();
        self.state()
            .upstream
            .entry(repository.to_string())
            .or_default()
            .insert(branch.to_string(), tree);
    }

    pub fn add_fork(&self, fork: &str) {
        self.state().forks.insert(fork.to_string());
    }

    pub fn fail_clone(&self, repository: &str) {
        self.state().fail_clone.insert(repository.to_string());
    }

    pub fn fail_push(&self, branch: &str) {
        self.state().fail_push.insert(branch.to_string());
    }

    pub fn fail_pull_request(&self, base: &str) {
        self.state().fail_pull_request.insert(base.to_string());
    }

    pub fn commits(&self) -> Vec<Commit> {
        self.state().commits.clone()
    }

    /// `(fork, branch)` pairs in push order.
    pub fn pushes(&self) -> Vec<(String, String)> {
        self.state().pushes.clone()
    }

    pub fn pull_requests(&self) -> Vec<PullRequest> {
        self.state().pull_requests.clone()
    }

    pub fn forks_created(&self) -> Vec<String> {
        self.state().forks_created.clone()
    }

    pub fn fork_branches(&self, fork: &str) -> HashSet<String> {
        self.state()
            .fork_branches
            .get(fork)
            .cloned()
            .unwrap_or_default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, HostState> {
        self.state.lock().unwrap()
    }
}

fn failed(command: &str, stderr: &str) -> GitError {
    GitError::Failed {
        command: command.to_string(),
        stderr: stderr.to_string(),
    }
}

fn read_tree(workdir: &Path, head: &Tree) -> Tree {
    head.keys()
        .filter_map(|path| {
            std::fs::read_to_string(workdir.join(path))
                .ok()
                .map(|content| (path.clone(), content))
        })
        .collect()
}

#[async_trait]
impl RepositoryClient for FakeHost {
    async fn clone_repository(
        &self,
        repository: &RepositoryId,
        destination: &Path,
    ) -> Result<(), GitError> {
        let mut state = self.state();
        let full_name = repository.full_name();
        if state.fail_clone.contains(&full_name) {
            return Err(failed("clone", "Authentication failed"));
        }
        if !state.upstream.contains_key(&full_name) {
            return Err(failed("clone", "Repository not found"));
        }

        std::fs::create_dir_all(destination).unwrap();
        let mut clone = WorkingCopy {
            repository: full_name.clone(),
            ..Default::default()
        };
        clone.remotes.insert(ORIGIN_REMOTE.to_string(), full_name);
        state.clones.insert(destination.to_path_buf(), clone);
        Ok(())
    }

    async fn configure_identity(
        &self,
        _workdir: &Path,
        _name: &str,
        _email: &str,
    ) -> Result<(), GitError> {
        Ok(())
    }

    async fn add_remote(
        &self,
        workdir: &Path,
        remote: &str,
        repository: &RepositoryId,
    ) -> Result<(), GitError> {
        let mut state = self.state();
        let clone = state
            .clones
            .get_mut(workdir)
            .ok_or_else(|| failed("remote add", "not a git repository"))?;
        clone
            .remotes
            .insert(remote.to_string(), repository.full_name());
        Ok(())
    }

    async fn fetch(&self, workdir: &Path, remote: &str) -> Result<(), GitError> {
        let state = self.state();
        let clone = state
            .clones
            .get(workdir)
            .ok_or_else(|| failed("fetch", "not a git repository"))?;
        if !clone.remotes.contains_key(remote) {
            return Err(failed("fetch", "no such remote"));
        }
        Ok(())
    }

    async fn remote_branch_exists(
        &self,
        workdir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<bool, GitError> {
        let state = self.state();
        let clone = state
            .clones
            .get(workdir)
            .ok_or_else(|| failed("rev-parse", "not a git repository"))?;
        let Some(target) = clone.remotes.get(remote) else {
            return Ok(false);
        };

        if remote == ORIGIN_REMOTE {
            return Ok(state
                .upstream
                .get(target)
                .is_some_and(|branches| branches.contains_key(branch)));
        }
        Ok(state
            .fork_branches
            .get(target)
            .is_some_and(|branches| branches.contains(branch)))
    }

    async fn checkout_remote_branch(
        &self,
        workdir: &Path,
        _remote: &str,
        branch: &str,
    ) -> Result<(), GitError> {
        let mut state = self.state();
        let repository = state
            .clones
            .get(workdir)
            .map(|clone| clone.repository.clone())
            .ok_or_else(|| failed("checkout", "not a git repository"))?;
        let tree = state
            .upstream
            .get(&repository)
            .and_then(|branches| branches.get(branch))
            .cloned()
            .ok_or_else(|| failed("checkout", "pathspec did not match"))?;

        let clone = state.clones.get_mut(workdir).unwrap();
        for path in clone.head.keys() {
            let _ = std::fs::remove_file(workdir.join(path));
        }
        for (path, content) in &tree {
            let full = workdir.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(full, content).unwrap();
        }
        clone.head = tree;
        clone.branch = Some(branch.to_string());
        Ok(())
    }

    async fn delete_local_branch(&self, _workdir: &Path, _branch: &str) -> Result<(), GitError> {
        Ok(())
    }

    async fn create_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError> {
        let mut state = self.state();
        let clone = state
            .clones
            .get_mut(workdir)
            .ok_or_else(|| failed("checkout -B", "not a git repository"))?;
        clone.branch = Some(branch.to_string());
        Ok(())
    }

    async fn stage_modified(&self, workdir: &Path) -> Result<Vec<PathBuf>, GitError> {
        let mut state = self.state();
        let clone = state
            .clones
            .get_mut(workdir)
            .ok_or_else(|| failed("add", "not a git repository"))?;
        let current = read_tree(workdir, &clone.head);
        clone.staged = current
            .into_iter()
            .filter(|(path, content)| clone.head.get(path) != Some(content))
            .collect();
        Ok(clone.staged.keys().cloned().collect())
    }

    async fn commit(&self, workdir: &Path, message: &str) -> Result<(), GitError> {
        let mut state = self.state();
        let clone = state
            .clones
            .get_mut(workdir)
            .ok_or_else(|| failed("commit", "not a git repository"))?;
        if clone.staged.is_empty() {
            return Err(failed("commit", "nothing to commit"));
        }
        let commit = Commit {
            repository: clone.repository.clone(),
            branch: clone.branch.clone().unwrap_or_default(),
            message: message.to_string(),
            files: std::mem::take(&mut clone.staged),
        };
        state.commits.push(commit);
        Ok(())
    }

    async fn push(&self, workdir: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        let mut state = self.state();
        let fork = state
            .clones
            .get(workdir)
            .and_then(|clone| clone.remotes.get(remote))
            .cloned()
            .ok_or_else(|| failed("push", "no such remote"))?;
        if state.fail_push.contains(branch) {
            return Err(failed("push", "remote rejected"));
        }
        state
            .fork_branches
            .entry(fork.clone())
            .or_default()
            .insert(branch.to_string());
        state.pushes.push((fork, branch.to_string()));
        Ok(())
    }
}

#[async_trait]
impl ReviewClient for FakeHost {
    async fn fork_exists(&self, upstream: &RepositoryId, owner: &str) -> Result<bool, ReviewError> {
        Ok(self
            .state()
            .forks
            .contains(&upstream.with_owner(owner).full_name()))
    }

    async fn create_fork(&self, upstream: &RepositoryId) -> Result<(), ReviewError> {
        let mut state = self.state();
        let fork = upstream.with_owner(&self.user).full_name();
        state.forks.insert(fork.clone());
        state.forks_created.push(fork);
        Ok(())
    }

    async fn find_open_pull_request(
        &self,
        upstream: &RepositoryId,
        head_owner: &str,
        head_branch: &str,
        base: &str,
    ) -> Result<Option<PullRequestRef>, ReviewError> {
        let head = format!("{head_owner}:{head_branch}");
        let repository = upstream.full_name();
        Ok(self
            .state()
            .pull_requests
            .iter()
            .find(|pr| pr.repository == repository && pr.head == head && pr.base == base)
            .map(|pr| PullRequestRef {
                number: pr.number,
                url: pr.url(),
            }))
    }

    async fn create_pull_request(
        &self,
        upstream: &RepositoryId,
        request: &NewPullRequest,
    ) -> Result<PullRequestRef, ReviewError> {
        let mut state = self.state();
        // GitHub refuses cross-repository heads it cannot resolve to a fork
        if state.fail_pull_request.contains(&request.base) {
            return Err(ReviewError::NotAFork {
                repository: request.head.clone(),
            });
        }
        let pr = PullRequest {
            repository: upstream.full_name(),
            number: state.pull_requests.len() as u64 + 1,
            head: request.head.clone(),
            base: request.base.clone(),
            title: request.title.clone(),
            body: request.body.clone(),
        };
        let reference = PullRequestRef {
            number: pr.number,
            url: pr.url(),
        };
        state.pull_requests.push(pr);
        Ok(reference)
    }
}
