//! NI-RFSG service implementation.
//!
//! Each RPC unpacks its request, then hands a marshal-and-invoke closure to
//! [`CallAdapter::run`] on the blocking pool. The adapter checks
//! cancellation, resolves the session and classifies the driver status; the
//! closure only converts wire data into the driver's layout.
//!
//! A successful call returns the driver status (warnings included). A failed
//! call returns a `Status` built by [`map_rfsg_error_to_status`].
//!
//! [`map_rfsg_error_to_status`]: crate::grpc::map_rfsg_error_to_status

use crate::grpc::call_context::GrpcCallContext;
use crate::grpc::error_mapping::RfsgResultExt;
use crate::shutdown::ShutdownSignal;
use rfsg_core::types::to_vi_boolean;
use rfsg_core::{
    as_complex_pairs, narrow_i16, waveform_name_to_c_string, CallAdapter, RfsgError,
    RfsgLibrary, RfsgResult, ViSession, ViStatus,
};
use rfsg_proto::nirfsg::ni_rfsg_server::NiRfsg;
use rfsg_proto::nirfsg::*;
use tonic::{Request, Response, Status};
use tracing::instrument;

/// Implementation of the `NiRfsg` gRPC interface.
#[derive(Clone)]
pub struct NiRfsgServiceImpl {
    adapter: CallAdapter,
    shutdown: ShutdownSignal,
}

impl NiRfsgServiceImpl {
    /// Service dispatching through `adapter`; calls are cancelled once `shutdown` fires.
    pub fn new(adapter: CallAdapter, shutdown: ShutdownSignal) -> Self {
        Self { adapter, shutdown }
    }

    /// Run the adapter for one call on the blocking pool.
    ///
    /// Driver calls may block on instrument I/O for an unbounded time, so
    /// they never run on the async workers. If this future is dropped while
    /// the call waits for a blocking thread, the call is answered as
    /// cancelled without reaching the driver.
    async fn run_blocking<F>(&self, session: String, invoke: F) -> Result<ViStatus, Status>
    where
        F: FnOnce(&dyn RfsgLibrary, ViSession) -> RfsgResult<ViStatus> + Send + 'static,
    {
        let (context, _abandon_on_drop) = GrpcCallContext::new(&self.shutdown);
        let adapter = self.adapter.clone();
        tokio::task::spawn_blocking(move || adapter.run(&context, &session, invoke))
            .await
            .unwrap_or_else(|e| Err(RfsgError::Internal(format!("Driver call task failed: {}", e))))
            .map_rfsg_err()
    }
}

fn session_name(vi: &Option<Session>) -> &str {
    vi.as_ref().map(|session| session.name.as_str()).unwrap_or_default()
}

#[tonic::async_trait]
impl NiRfsg for NiRfsgServiceImpl {
    #[instrument(
        skip_all,
        fields(
            session = session_name(&request.get_ref().vi),
            waveform = %request.get_ref().waveform_name,
            elements = request.get_ref().wfm_data.len(),
        )
    )]
    async fn write_arb_waveform_complex_f32(
        &self,
        request: Request<WriteArbWaveformComplexF32Request>,
    ) -> Result<Response<WriteArbWaveformComplexF32Response>, Status> {
        let req = request.into_inner();
        let session = session_name(&req.vi).to_string();
        let WriteArbWaveformComplexF32Request {
            waveform_name,
            wfm_data,
            more_data_pending,
            ..
        } = req;

        let status = self
            .run_blocking(session, move |library, vi| {
                let name = waveform_name_to_c_string(&waveform_name)?;
                let view = as_complex_pairs(&wfm_data)?;
                Ok(library.write_arb_waveform_complex_f32(
                    vi,
                    &name,
                    view.number_of_samples(),
                    view.pairs(),
                    to_vi_boolean(more_data_pending),
                ))
            })
            .await?;

        Ok(Response::new(WriteArbWaveformComplexF32Response { status }))
    }

    #[instrument(
        skip_all,
        fields(
            session = session_name(&request.get_ref().vi),
            waveform = %request.get_ref().waveform_name,
            elements = request.get_ref().wfm_data.len(),
        )
    )]
    async fn write_arb_waveform_complex_f64(
        &self,
        request: Request<WriteArbWaveformComplexF64Request>,
    ) -> Result<Response<WriteArbWaveformComplexF64Response>, Status> {
        let req = request.into_inner();
        let session = session_name(&req.vi).to_string();
        let WriteArbWaveformComplexF64Request {
            waveform_name,
            wfm_data,
            more_data_pending,
            ..
        } = req;

        let status = self
            .run_blocking(session, move |library, vi| {
                let name = waveform_name_to_c_string(&waveform_name)?;
                let view = as_complex_pairs(&wfm_data)?;
                Ok(library.write_arb_waveform_complex_f64(
                    vi,
                    &name,
                    view.number_of_samples(),
                    view.pairs(),
                    to_vi_boolean(more_data_pending),
                ))
            })
            .await?;

        Ok(Response::new(WriteArbWaveformComplexF64Response { status }))
    }

    #[instrument(
        skip_all,
        fields(
            session = session_name(&request.get_ref().vi),
            waveform = %request.get_ref().waveform_name,
            elements = request.get_ref().wfm_data.len(),
        )
    )]
    async fn write_arb_waveform_complex_i16(
        &self,
        request: Request<WriteArbWaveformComplexI16Request>,
    ) -> Result<Response<WriteArbWaveformComplexI16Response>, Status> {
        let req = request.into_inner();
        let session = session_name(&req.vi).to_string();
        let WriteArbWaveformComplexI16Request {
            waveform_name,
            wfm_data,
            ..
        } = req;

        let status = self
            .run_blocking(session, move |library, vi| {
                let name = waveform_name_to_c_string(&waveform_name)?;
                // Odd lengths are rejected by the pairing step, not here.
                let samples = narrow_i16(&wfm_data)?;
                let view = as_complex_pairs(&samples)?;
                Ok(library.write_arb_waveform_complex_i16(
                    vi,
                    &name,
                    view.number_of_samples(),
                    view.pairs(),
                ))
            })
            .await?;

        Ok(Response::new(WriteArbWaveformComplexI16Response { status }))
    }
}
