mod fakes;
mod storage_failure;
