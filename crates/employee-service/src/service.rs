//! The employee facade.
//!
//! Reads go through the cache, which loads through the resilience pipeline.
//! Derived queries are computed from the cached collection and guarded by
//! their own breakers. Writes bypass the cache and invalidate it on success.

use crate::query;
use employee_config::FacadeConfig;
use employee_core::{
    Employee, EmployeeCollectionResult, EmployeeCreateRequest, EmployeeError, EmployeeResult,
    Operation,
};
use employee_resilience::{
    CacheStats, CircuitBreakerConfig, CircuitBreakerRegistry, CircuitBreakerStats,
    ResiliencePipeline, ResponseCache, RetryConfig, RetryPolicy,
};
use employee_telemetry::operation_span;
use employee_upstream::{EmployeeUpstream, HttpUpstreamClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Instrument};

/// Employee operations with retry, circuit breaking, caching and fallbacks
#[derive(Clone)]
pub struct EmployeeService {
    upstream: Arc<dyn EmployeeUpstream>,
    pipeline: ResiliencePipeline,
    cache: Arc<ResponseCache>,
}

impl std::fmt::Debug for EmployeeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeService")
            .field("pipeline", &self.pipeline)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl EmployeeService {
    /// Start building a service around an upstream
    #[must_use]
    pub fn builder(upstream: Arc<dyn EmployeeUpstream>) -> EmployeeServiceBuilder {
        EmployeeServiceBuilder::new(upstream)
    }

    /// Build the service and its HTTP upstream client from configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn from_config(config: &FacadeConfig) -> EmployeeResult<Self> {
        let upstream = HttpUpstreamClient::new(&config.upstream)?;
        info!(base_url = %upstream.base_url(), "Using upstream employee service");
        Ok(Self::builder(Arc::new(upstream)).with_config(config).build())
    }

    /// Every employee. Served from the cache within its TTL.
    ///
    /// # Errors
    /// Returns `UpstreamUnavailable` or `MalformedResponse`; throttling yields
    /// an error-tagged collection instead
    pub async fn get_all_employees(&self) -> EmployeeResult<EmployeeCollectionResult> {
        self.cached_collection()
            .instrument(operation_span!(Operation::GetAll))
            .await
    }

    /// Employees whose name contains `search`, ignoring case
    ///
    /// # Errors
    /// Returns `UpstreamUnavailable` or `MalformedResponse`
    pub async fn get_employees_by_name(
        &self,
        search: &str,
    ) -> EmployeeResult<EmployeeCollectionResult> {
        self.pipeline
            .guard(Operation::Search, || async {
                let employees = self.employees().await?;
                let matches = query::search_by_name(&employees, search);
                debug!(search = %search, matches = matches.len(), "Searched employees");
                Ok(EmployeeCollectionResult::ok(matches))
            })
            .instrument(operation_span!(Operation::Search))
            .await
    }

    /// The employee with `id`; a degraded read yields the placeholder employee
    ///
    /// # Errors
    /// Returns `NotFound` if no employee has this id
    pub async fn get_employee_by_id(&self, id: &str) -> EmployeeResult<Employee> {
        self.pipeline
            .guard(Operation::GetById, || async {
                let employees = self.employees().await?;
                query::find_by_id(&employees, id)
            })
            .instrument(operation_span!(Operation::GetById))
            .await
    }

    /// Highest salary; `None` when there is no data
    ///
    /// # Errors
    /// Returns `UpstreamUnavailable` or `MalformedResponse`
    pub async fn get_highest_salary_of_employees(&self) -> EmployeeResult<Option<u32>> {
        self.pipeline
            .guard(Operation::MaxSalary, || async {
                let employees = self.employees().await?;
                Ok(query::max_salary(&employees))
            })
            .instrument(operation_span!(Operation::MaxSalary))
            .await
    }

    /// Names of the ten highest earners, highest first
    ///
    /// # Errors
    /// Returns `UpstreamUnavailable` or `MalformedResponse`
    pub async fn get_top_ten_highest_earning_employee_names(&self) -> EmployeeResult<Vec<String>> {
        self.top_earners(query::TOP_EARNERS_LIMIT).await
    }

    /// Names of the `n` highest earners, highest first
    ///
    /// # Errors
    /// Returns `UpstreamUnavailable` or `MalformedResponse`
    pub async fn top_earners(&self, n: usize) -> EmployeeResult<Vec<String>> {
        self.pipeline
            .guard(Operation::TopEarners, || async {
                let employees = self.employees().await?;
                Ok(query::top_earners(&employees, n))
            })
            .instrument(operation_span!(Operation::TopEarners))
            .await
    }

    /// Create an employee; a throttled create yields the placeholder employee
    ///
    /// # Errors
    /// Returns `Validation` without contacting the upstream if required fields
    /// are missing, or the upstream's non-degradable error
    pub async fn create_employee(&self, request: EmployeeCreateRequest) -> EmployeeResult<Employee> {
        let request = request.validated()?;

        async {
            let created = self
                .pipeline
                .call(Operation::Create, || self.upstream.create(&request))
                .await?;

            if !created.is_placeholder() {
                self.cache.invalidate();
                info!(id = %created.id, name = %created.name, "Employee created");
            }
            Ok(created)
        }
        .instrument(operation_span!(Operation::Create))
        .await
    }

    /// Delete the employee with `id`, returning the upstream acknowledgement.
    ///
    /// The upstream deletes by name, so the id is resolved through
    /// [`get_employee_by_id`](Self::get_employee_by_id) first. A degraded
    /// lookup or a throttled delete yields the empty string.
    ///
    /// # Errors
    /// Returns `NotFound` if no employee has this id
    pub async fn delete_employee_by_id(&self, id: &str) -> EmployeeResult<String> {
        self.pipeline
            .guard(Operation::Delete, || async {
                let employee = self.get_employee_by_id(id).await?;
                if employee.is_placeholder() {
                    return Err(EmployeeError::degraded(
                        "employee lookup returned a degraded result",
                    ));
                }

                let name = employee.name;
                let ack = self
                    .pipeline
                    .retrying(Operation::Delete, || self.upstream.delete(&name))
                    .await?;
                info!(id = %id, name = %name, "Employee deleted");
                self.cache.invalidate();
                Ok(ack)
            })
            .instrument(operation_span!(Operation::Delete))
            .await
    }

    /// Breaker statistics for every operation
    #[must_use]
    pub fn circuit_snapshot(&self) -> Vec<CircuitBreakerStats> {
        self.pipeline.breakers().snapshot()
    }

    /// Response cache statistics
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The resilience pipeline (breakers are reachable through it)
    #[must_use]
    pub fn pipeline(&self) -> &ResiliencePipeline {
        &self.pipeline
    }

    async fn cached_collection(&self) -> EmployeeResult<EmployeeCollectionResult> {
        self.cache
            .get_or_load(|| {
                self.pipeline
                    .call(Operation::GetAll, || self.upstream.fetch_all())
            })
            .await
    }

    async fn employees(&self) -> EmployeeResult<Vec<Employee>> {
        self.cached_collection().await?.into_employees()
    }
}

/// Builder for [`EmployeeService`]
pub struct EmployeeServiceBuilder {
    upstream: Arc<dyn EmployeeUpstream>,
    retry: RetryConfig,
    circuit_breaker: CircuitBreakerConfig,
    cache_ttl: Duration,
}

impl EmployeeServiceBuilder {
    /// Create a builder with default policies
    #[must_use]
    pub fn new(upstream: Arc<dyn EmployeeUpstream>) -> Self {
        Self {
            upstream,
            retry: RetryConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            cache_ttl: Duration::from_secs(30),
        }
    }

    /// Take retry, breaker and cache policy from configuration
    #[must_use]
    pub fn with_config(self, config: &FacadeConfig) -> Self {
        self.retry(RetryConfig::from(&config.retry))
            .circuit_breaker(CircuitBreakerConfig::from(&config.circuit_breaker))
            .cache_ttl(config.cache.ttl)
    }

    /// Set the retry policy
    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the circuit breaker policy
    #[must_use]
    pub fn circuit_breaker(mut self, config: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = config;
        self
    }

    /// Set the cache TTL
    #[must_use]
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Build the service
    #[must_use]
    pub fn build(self) -> EmployeeService {
        let breakers = Arc::new(CircuitBreakerRegistry::new(self.circuit_breaker));
        EmployeeService {
            upstream: self.upstream,
            pipeline: ResiliencePipeline::new(RetryPolicy::new(self.retry), breakers),
            cache: Arc::new(ResponseCache::new(self.cache_ttl)),
        }
    }
}
