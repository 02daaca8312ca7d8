mod export;
mod generations;
